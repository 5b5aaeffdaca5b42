use crate::core::balance::Balances;
use crate::core::member::MemberId;
use crate::core::payment::Payment;
use crate::error::{LedgerError, Result};
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::VecDeque;

/// Configuration for the settlement planner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Largest absolute sum of balances still accepted as zero-sum.
    ///
    /// Uneven splits leave a residual far below a cent; anything above
    /// this is treated as an inconsistent balance map.
    pub zero_sum_tolerance: Decimal,
}

impl PlannerConfig {
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.zero_sum_tolerance = tolerance.abs();
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            zero_sum_tolerance: dec!(0.000001),
        }
    }
}

/// Plans the payments that settle a group.
///
/// # Algorithm
///
/// Greedy largest-pair matching:
///
/// 1. Split members into creditors (balance > 0) and debtors (balance < 0,
///    kept as positive magnitudes). Settled members are skipped.
/// 2. Sort both lists descending. The sort is stable, so equal balances keep
///    the insertion order of the balance map.
/// 3. While both lists are non-empty, match the largest creditor with the
///    largest debtor for `min(credit, debt)`. Whoever has a remainder is put
///    back at its sorted position, after any entries with an equal amount.
///
/// This does not always find the fewest possible payments, but the plan is
/// deterministic and emits at most `creditors + debtors - 1` payments.
///
/// # Examples
///
/// ```
/// use split_ledger::core::balance::Balances;
/// use split_ledger::core::member::MemberId;
/// use split_ledger::settlement::planner::SettlementPlanner;
/// use rust_decimal_macros::dec;
///
/// let alice = MemberId::new(1);
/// let bob = MemberId::new(2);
/// let balances: Balances = [(alice, dec!(60)), (bob, dec!(-60))].into_iter().collect();
///
/// let payments = SettlementPlanner::default().compute_payments(&balances).unwrap();
/// assert_eq!(payments.len(), 1);
/// assert_eq!(payments[0].debtor, bob);
/// assert_eq!(payments[0].creditor, alice);
/// assert_eq!(payments[0].amount, dec!(60));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementPlanner {
    config: PlannerConfig,
}

impl SettlementPlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Compute the ordered list of payments that zero out `balances`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::PreconditionViolation`] if the balances do not sum to
    /// zero within the configured tolerance, [`LedgerError::AmountOverflow`]
    /// if their sum cannot be represented.
    pub fn compute_payments(&self, balances: &Balances) -> Result<Vec<Payment>> {
        let imbalance = balances.sum()?;
        if imbalance.abs() > self.config.zero_sum_tolerance {
            warn!(
                "Refusing to settle {} members: balances sum to {}",
                balances.len(),
                imbalance
            );
            return Err(LedgerError::PreconditionViolation { imbalance });
        }
        Ok(Self::compute_payments_unchecked(balances))
    }

    /// Run the matching without checking the zero-sum precondition.
    ///
    /// On an inconsistent map this stops as soon as either side runs out,
    /// leaving the remainder of the other side unsettled.
    pub fn compute_payments_unchecked(balances: &Balances) -> Vec<Payment> {
        let mut creditors = sorted_descending(balances.creditors());
        let mut debtors = sorted_descending(balances.debtors());
        let mut payments = Vec::with_capacity(creditors.len() + debtors.len());

        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some((creditor, credit)), Some((debtor, debt))) =
                (creditors.pop_front(), debtors.pop_front())
            else {
                break;
            };
            let amount = credit.min(debt);
            payments.push(Payment::new(debtor, creditor, amount));

            let credit_left = credit - amount;
            if credit_left > Decimal::ZERO {
                insert_ordered(&mut creditors, creditor, credit_left);
            }
            let debt_left = debt - amount;
            if debt_left > Decimal::ZERO {
                insert_ordered(&mut debtors, debtor, debt_left);
            }
        }

        if !creditors.is_empty() || !debtors.is_empty() {
            debug!(
                "Settlement stopped with {} creditors and {} debtors left",
                creditors.len(),
                debtors.len()
            );
        }
        debug!(
            "Planned {} payments for {} members",
            payments.len(),
            balances.len()
        );
        payments
    }
}

fn sorted_descending(mut entries: Vec<(MemberId, Decimal)>) -> VecDeque<(MemberId, Decimal)> {
    // `sort_by` is stable: ties keep insertion order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.into()
}

/// Put `member` back into a descending list, after every entry whose
/// amount is greater than or equal to `amount`.
fn insert_ordered(list: &mut VecDeque<(MemberId, Decimal)>, member: MemberId, amount: Decimal) {
    let index = list.partition_point(|(_, existing)| *existing >= amount);
    list.insert(index, (member, amount));
}

/// Apply payments to a copy of `balances`: each payment raises the debtor
/// and lowers the creditor by its amount.
///
/// Settling a zero-sum map with its own plan yields a map of zeros.
/// Payments naming a member outside `balances` are an error.
pub fn apply_payments(balances: &Balances, payments: &[Payment]) -> Result<Balances> {
    let mut remaining = balances.clone();
    for payment in payments {
        remaining.credit(payment.debtor, payment.amount)?;
        remaining.debit(payment.creditor, payment.amount)?;
    }
    Ok(remaining)
}
