use crate::core::balance::Balances;
use crate::core::group::GroupId;
use crate::core::member::{Member, MemberId};
use crate::core::payment::Payment;
use crate::error::{LedgerError, Result};
use crate::settlement::aggregator::BalanceAggregator;
use crate::settlement::planner::SettlementPlanner;
use crate::store::LedgerStore;
use indexmap::IndexMap;
use log::info;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One payment as presented to clients: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// The group summary handed to the outside world.
///
/// Serializes as
/// `{ "balances": { name: amount }, "payments": [{ "from", "to", "amount" }] }`.
/// Amounts are rounded to two decimal places here and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub balances: IndexMap<String, f64>,
    pub payments: Vec<PaymentSummary>,
}

impl GroupSummary {
    /// Attach member names to computed balances and payments.
    ///
    /// Fails with [`LedgerError::UnknownMember`] if an id has no name in
    /// `members`.
    pub fn build(members: &[Member], balances: &Balances, payments: &[Payment]) -> Result<Self> {
        let names: HashMap<MemberId, &str> = members.iter().map(|m| (m.id(), m.name())).collect();
        let name_of = |id: MemberId| -> Result<String> {
            names
                .get(&id)
                .map(|name| name.to_string())
                .ok_or(LedgerError::UnknownMember(id))
        };

        let mut named_balances = IndexMap::with_capacity(balances.len());
        for (member, balance) in balances.iter() {
            named_balances.insert(name_of(member)?, round_amount(balance));
        }

        let payments = payments
            .iter()
            .map(|p| {
                Ok(PaymentSummary {
                    from: name_of(p.debtor)?,
                    to: name_of(p.creditor)?,
                    amount: round_amount(p.amount),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            balances: named_balances,
            payments,
        })
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Round to cents, halves away from zero.
pub fn round_amount(amount: Decimal) -> f64 {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    // -0.00 would otherwise print with a sign.
    if rounded.is_zero() {
        return 0.0;
    }
    rounded.to_f64().unwrap_or(0.0)
}

/// Run the full pipeline for one group: load the snapshot, aggregate
/// balances, plan payments and format the result.
pub fn summarize_group<S: LedgerStore + ?Sized>(
    store: &S,
    group: GroupId,
    planner: &SettlementPlanner,
) -> Result<GroupSummary> {
    let members = store.list_members(group)?;
    let expenses = store.list_expenses(group)?;

    let balances = BalanceAggregator::compute_balances(&members, &expenses)?;
    let payments = planner.compute_payments(&balances)?;

    info!(
        "Group {}: {} members, {} expenses, {} payments",
        group,
        members.len(),
        expenses.len(),
        payments.len()
    );
    GroupSummary::build(&members, &balances, &payments)
}

impl std::fmt::Display for GroupSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balances ===")?;
        for (name, balance) in &self.balances {
            let status = if *balance > 0.0 {
                "is owed"
            } else if *balance < 0.0 {
                "owes"
            } else {
                "settled"
            };
            writeln!(f, "  {:<15} {:>12.2}  [{}]", name, balance, status)?;
        }

        writeln!(f, "\n=== Payments ===")?;
        if self.payments.is_empty() {
            writeln!(f, "  Nothing to settle.")?;
        }
        for payment in &self.payments {
            writeln!(
                f,
                "  {} -> {}: {:.2}",
                payment.from, payment.to, payment.amount
            )?;
        }
        Ok(())
    }
}
