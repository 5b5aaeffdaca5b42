use crate::core::member::MemberId;
use crate::error::{LedgerError, Result};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net balance of each member of a group.
///
/// A positive balance means the group owes the member (net creditor).
/// A negative balance means the member owes the group (net debtor).
///
/// Entries keep the order in which members were first inserted, which is
/// the order the settlement planner uses to break ties between equal
/// balances. Balances are derived data: they are recomputed from the
/// expense list on every request and never stored.
///
/// # Examples
///
/// ```
/// use split_ledger::core::balance::Balances;
/// use split_ledger::core::member::MemberId;
/// use rust_decimal_macros::dec;
///
/// let alice = MemberId::new(1);
/// let bob = MemberId::new(2);
/// let balances: Balances = [(alice, dec!(60)), (bob, dec!(-60))].into_iter().collect();
///
/// assert!(balances.is_balanced(dec!(0)));
/// assert_eq!(balances.total_outstanding(), Ok(dec!(60)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    entries: IndexMap<MemberId, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every listed member at exactly zero.
    pub fn with_members(members: impl IntoIterator<Item = MemberId>) -> Self {
        let mut balances = Self::new();
        for member in members {
            balances.entries.entry(member).or_insert(Decimal::ZERO);
        }
        balances
    }

    /// Increase a member's balance.
    ///
    /// Fails with [`LedgerError::UnknownMember`] if the member is not tracked
    /// and [`LedgerError::AmountOverflow`] if the balance leaves the decimal
    /// range. The balance is unchanged on failure.
    pub fn credit(&mut self, member: MemberId, amount: Decimal) -> Result<()> {
        let balance = self
            .entries
            .get_mut(&member)
            .ok_or(LedgerError::UnknownMember(member))?;
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow(format!("crediting member {}", member)))?;
        Ok(())
    }

    /// Decrease a member's balance. Fails like [`Balances::credit`].
    pub fn debit(&mut self, member: MemberId, amount: Decimal) -> Result<()> {
        let balance = self
            .entries
            .get_mut(&member)
            .ok_or(LedgerError::UnknownMember(member))?;
        *balance = balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::overflow(format!("debiting member {}", member)))?;
        Ok(())
    }

    pub fn get(&self, member: MemberId) -> Option<Decimal> {
        self.entries.get(&member).copied()
    }

    pub fn contains(&self, member: MemberId) -> bool {
        self.entries.contains_key(&member)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MemberId, Decimal)> + '_ {
        self.entries.iter().map(|(m, b)| (*m, *b))
    }

    pub fn members(&self) -> impl Iterator<Item = MemberId> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every balance. Zero for a consistent group, up to the
    /// residual of uneven splits.
    pub fn sum(&self) -> Result<Decimal> {
        checked_total(self.entries.values(), "summing balances")
    }

    /// Whether the balances sum to zero within `tolerance`. A sum outside
    /// the decimal range is never balanced.
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.sum().is_ok_and(|sum| sum.abs() <= tolerance)
    }

    /// Members owed money, in insertion order.
    pub fn creditors(&self) -> Vec<(MemberId, Decimal)> {
        self.iter().filter(|(_, b)| *b > Decimal::ZERO).collect()
    }

    /// Members owing money, as positive magnitudes, in insertion order.
    pub fn debtors(&self) -> Vec<(MemberId, Decimal)> {
        self.iter()
            .filter(|(_, b)| *b < Decimal::ZERO)
            .map(|(m, b)| (m, -b))
            .collect()
    }

    /// Total amount that has to change hands to settle the group
    /// (sum of positive balances).
    pub fn total_outstanding(&self) -> Result<Decimal> {
        checked_total(
            self.entries.values().filter(|b| **b > Decimal::ZERO),
            "totalling outstanding balances",
        )
    }

    /// Whether every balance is exactly zero.
    pub fn is_settled(&self) -> bool {
        self.entries.values().all(|b| b.is_zero())
    }
}

impl FromIterator<(MemberId, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (MemberId, Decimal)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Add up `amounts`, failing instead of overflowing.
pub(crate) fn checked_total<'a>(
    amounts: impl IntoIterator<Item = &'a Decimal>,
    context: &str,
) -> Result<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(*amount))
        .ok_or_else(|| LedgerError::overflow(context))
}
