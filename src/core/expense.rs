use crate::core::balance::checked_total;
use crate::core::group::GroupId;
use crate::core::member::MemberId;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a recorded expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The portion of an expense fronted by one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditorShare {
    pub member: MemberId,
    pub amount: Decimal,
}

impl CreditorShare {
    pub fn new(member: MemberId, amount: Decimal) -> Self {
        Self { member, amount }
    }
}

/// A shared expense within a group.
///
/// One or more creditors paid `total_amount` between them; the cost is
/// split evenly across every listed debtor. A member may appear on both
/// sides, in which case their own share nets against what they paid.
///
/// Expenses are validated on construction and only change through a
/// wholesale replacement in the store.
///
/// # Examples
///
/// ```
/// use split_ledger::core::expense::{CreditorShare, Expense, ExpenseId};
/// use split_ledger::core::group::GroupId;
/// use split_ledger::core::member::MemberId;
/// use rust_decimal_macros::dec;
///
/// let alice = MemberId::new(1);
/// let bob = MemberId::new(2);
/// let expense = Expense::new(
///     ExpenseId::new(1),
///     GroupId::new(),
///     "Taxi",
///     dec!(60),
///     vec![CreditorShare::new(alice, dec!(60))],
///     vec![alice, bob],
/// )
/// .unwrap();
///
/// assert_eq!(expense.share_per_debtor(), dec!(30));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    group_id: GroupId,
    description: String,
    total_amount: Decimal,
    creditors: Vec<CreditorShare>,
    debtors: Vec<MemberId>,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a validated expense.
    ///
    /// Fails with [`LedgerError::InvalidExpense`] when the total is not
    /// positive, there are no debtors, or the creditor amounts do not add
    /// up to the total, and with [`LedgerError::AmountOverflow`] when the
    /// creditor amounts cannot be added up.
    pub fn new(
        id: ExpenseId,
        group_id: GroupId,
        description: impl Into<String>,
        total_amount: Decimal,
        creditors: Vec<CreditorShare>,
        debtors: Vec<MemberId>,
    ) -> Result<Self> {
        let expense = Self {
            id,
            group_id,
            description: description.into(),
            total_amount,
            creditors,
            debtors,
            created_at: Utc::now(),
        };
        expense.validate()?;
        Ok(expense)
    }

    /// Check the expense invariants.
    pub fn validate(&self) -> Result<()> {
        if self.total_amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_expense(format!(
                "expense {} total must be positive, got {}",
                self.id, self.total_amount
            )));
        }
        if self.debtors.is_empty() {
            return Err(LedgerError::invalid_expense(format!(
                "expense {} has no debtors",
                self.id
            )));
        }
        let credited = self.credited_total()?;
        if credited != self.total_amount {
            return Err(LedgerError::invalid_expense(format!(
                "expense {} creditors add up to {} but total is {}",
                self.id, credited, self.total_amount
            )));
        }
        Ok(())
    }

    /// Each debtor's even share of the total.
    ///
    /// Computed once per expense; non-terminating divisions keep their
    /// residual rather than being reconciled to the cent. Returns zero for
    /// an expense with no debtors, which `validate` rejects.
    pub fn share_per_debtor(&self) -> Decimal {
        if self.debtors.is_empty() {
            return Decimal::ZERO;
        }
        self.total_amount / Decimal::from(self.debtors.len())
    }

    /// Sum of all creditor amounts.
    pub fn credited_total(&self) -> Result<Decimal> {
        checked_total(
            self.creditors.iter().map(|c| &c.amount),
            &format!("adding up the creditors of expense {}", self.id),
        )
    }

    /// Whether the member appears as a creditor or a debtor.
    pub fn references(&self, member: MemberId) -> bool {
        self.creditors.iter().any(|c| c.member == member) || self.debtors.contains(&member)
    }

    /// All unique members referenced by this expense.
    pub fn members(&self) -> Vec<MemberId> {
        let mut members: Vec<MemberId> = self
            .creditors
            .iter()
            .map(|c| c.member)
            .chain(self.debtors.iter().copied())
            .collect();
        members.sort();
        members.dedup();
        members
    }

    // --- Accessors ---

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn creditors(&self) -> &[CreditorShare] {
        &self.creditors
    }

    pub fn debtors(&self) -> &[MemberId] {
        &self.debtors
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// The caller-supplied fields of an expense, before an id is assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub description: String,
    pub total_amount: Decimal,
    pub creditors: Vec<CreditorShare>,
    pub debtors: Vec<MemberId>,
}

impl NewExpense {
    pub fn new(
        description: impl Into<String>,
        total_amount: Decimal,
        creditors: Vec<CreditorShare>,
        debtors: Vec<MemberId>,
    ) -> Self {
        Self {
            description: description.into(),
            total_amount,
            creditors,
            debtors,
        }
    }

    /// Attach an id and group, validating the result.
    pub fn into_expense(self, id: ExpenseId, group_id: GroupId) -> Result<Expense> {
        Expense::new(
            id,
            group_id,
            self.description,
            self.total_amount,
            self.creditors,
            self.debtors,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids() -> (MemberId, MemberId, MemberId) {
        (MemberId::new(1), MemberId::new(2), MemberId::new(3))
    }

    fn pizza() -> Expense {
        let (alice, bob, carol) = ids();
        Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Pizza",
            dec!(90),
            vec![CreditorShare::new(alice, dec!(90))],
            vec![alice, bob, carol],
        )
        .unwrap()
    }

    #[test]
    fn test_expense_creation() {
        let expense = pizza();
        assert_eq!(expense.description(), "Pizza");
        assert_eq!(expense.total_amount(), dec!(90));
        assert_eq!(expense.share_per_debtor(), dec!(30));
        assert_eq!(expense.debtors().len(), 3);
    }

    #[test]
    fn test_expense_without_debtors_is_rejected() {
        let (alice, _, _) = ids();
        let result = Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Nobody ate",
            dec!(10),
            vec![CreditorShare::new(alice, dec!(10))],
            vec![],
        );
        assert!(matches!(result, Err(LedgerError::InvalidExpense { .. })));
    }

    #[test]
    fn test_creditor_sum_must_match_total() {
        let (alice, bob, _) = ids();
        let result = Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Groceries",
            dec!(100),
            vec![
                CreditorShare::new(alice, dec!(40)),
                CreditorShare::new(bob, dec!(50)),
            ],
            vec![alice, bob],
        );
        assert!(matches!(result, Err(LedgerError::InvalidExpense { .. })));
    }

    #[test]
    fn test_non_positive_total_is_rejected() {
        let (alice, _, _) = ids();
        let result = Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Refund",
            dec!(0),
            vec![],
            vec![alice],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_references_and_members() {
        let (alice, bob, _) = ids();
        let expense = Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Cinema",
            dec!(24),
            vec![CreditorShare::new(bob, dec!(24))],
            vec![alice, bob],
        )
        .unwrap();
        assert!(expense.references(alice));
        assert!(expense.references(bob));
        assert!(!expense.references(MemberId::new(99)));
        assert_eq!(expense.members(), vec![alice, bob]);
    }

    #[test]
    fn test_uneven_share_keeps_residual() {
        let (alice, bob, carol) = ids();
        let expense = Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Dinner",
            dec!(100),
            vec![CreditorShare::new(alice, dec!(100))],
            vec![alice, bob, carol],
        )
        .unwrap();
        let share = expense.share_per_debtor();
        assert!(share > dec!(33.33) && share < dec!(33.34));
    }

    #[test]
    fn test_overflowing_creditors_are_rejected() {
        let (alice, bob, _) = ids();
        let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
        let result = Expense::new(
            ExpenseId::new(1),
            GroupId::new(),
            "Yacht",
            huge,
            vec![CreditorShare::new(alice, huge), CreditorShare::new(bob, huge)],
            vec![alice, bob],
        );
        assert!(matches!(result, Err(LedgerError::AmountOverflow { .. })));
    }
}
