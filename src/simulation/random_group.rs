//! Random group generation for stress testing the settlement pipeline.

use crate::core::expense::{CreditorShare, Expense, ExpenseId};
use crate::core::group::GroupId;
use crate::core::member::{Member, MemberId};
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Minimum expense total.
    pub min_amount: Decimal,
    /// Maximum expense total.
    pub max_amount: Decimal,
    /// Upper bound on how many members front a single expense.
    pub max_creditors: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            member_count: 6,
            expense_count: 20,
            min_amount: Decimal::from(5),
            max_amount: Decimal::from(500),
            max_creditors: 2,
        }
    }
}

/// A consistent members + expenses snapshot of one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group_id: GroupId,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

/// Generate a random group whose expenses all satisfy the expense invariants.
///
/// Totals are whole cents. Creditor amounts are cut from the total so they
/// add up to it exactly; every expense has at least one debtor.
pub fn generate_random_group(config: &GroupConfig) -> Result<GroupSnapshot> {
    let mut rng = rand::thread_rng();
    let group_id = GroupId::new();

    let members: Vec<Member> = (0..config.member_count)
        .map(|i| {
            Member::new(
                MemberId::new(i as u64 + 1),
                format!("MEMBER-{:03}", i),
                group_id,
            )
        })
        .collect();
    let ids: Vec<MemberId> = members.iter().map(Member::id).collect();

    let mut expenses = Vec::with_capacity(config.expense_count);
    if ids.is_empty() {
        return Ok(GroupSnapshot {
            group_id,
            members,
            expenses,
        });
    }

    let min_cents = to_cents(config.min_amount).max(1);
    let max_cents = to_cents(config.max_amount).max(min_cents);

    for n in 0..config.expense_count {
        let total_cents = rng.gen_range(min_cents..=max_cents);
        let total = Decimal::new(total_cents, 2);

        let creditor_count = rng
            .gen_range(1..=config.max_creditors.max(1))
            .min(ids.len())
            .min(total_cents as usize);
        let payers: Vec<MemberId> = ids.choose_multiple(&mut rng, creditor_count).copied().collect();
        let creditors = split_among(&mut rng, total_cents, payers);

        let debtor_count = rng.gen_range(1..=ids.len());
        let debtors: Vec<MemberId> = ids.choose_multiple(&mut rng, debtor_count).copied().collect();

        expenses.push(Expense::new(
            ExpenseId::new(n as u64 + 1),
            group_id,
            format!("EXPENSE-{:03}", n),
            total,
            creditors,
            debtors,
        )?);
    }

    Ok(GroupSnapshot {
        group_id,
        members,
        expenses,
    })
}

fn to_cents(amount: Decimal) -> i64 {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
        .unwrap_or(0)
}

/// Split `total_cents` into one positive share per creditor.
fn split_among<R: Rng>(rng: &mut R, total_cents: i64, creditors: Vec<MemberId>) -> Vec<CreditorShare> {
    let mut remaining = total_cents;
    let mut shares = Vec::with_capacity(creditors.len());
    let last = creditors.len().saturating_sub(1);

    for (i, member) in creditors.into_iter().enumerate() {
        let cents = if i == last {
            remaining
        } else {
            // Leave at least one cent for each creditor still to come.
            let reserve = (last - i) as i64;
            rng.gen_range(1..=remaining - reserve)
        };
        remaining -= cents;
        shares.push(CreditorShare::new(member, Decimal::new(cents, 2)));
    }
    shares
}
