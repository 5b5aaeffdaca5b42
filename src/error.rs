//! Error types for the ledger.

use crate::core::expense::ExpenseId;
use crate::core::group::GroupId;
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while recording expenses or computing settlements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An expense violates its own invariants (no debtors, credits that
    /// do not add up to the total, non-positive total).
    #[error("invalid expense: {reason}")]
    InvalidExpense { reason: String },

    /// An expense or balance references a member outside the snapshot.
    #[error("unknown member {0}")]
    UnknownMember(MemberId),

    /// The balance map handed to the planner does not sum to zero.
    #[error("balances do not sum to zero (imbalance {imbalance})")]
    PreconditionViolation { imbalance: Decimal },

    /// Adding up amounts left the representable decimal range.
    #[error("amount overflow while {context}")]
    AmountOverflow { context: String },

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("member {member} not found in group {group}")]
    MemberNotFound { group: GroupId, member: MemberId },

    #[error("expense {expense} not found in group {group}")]
    ExpenseNotFound { group: GroupId, expense: ExpenseId },

    #[error("a member named '{name}' already exists in group {group}")]
    DuplicateMemberName { group: GroupId, name: String },

    /// Members referenced by an expense cannot be removed.
    #[error("member {member} is referenced by expense {expense}")]
    MemberInUse { member: MemberId, expense: ExpenseId },
}

impl LedgerError {
    pub(crate) fn invalid_expense(reason: impl Into<String>) -> Self {
        LedgerError::InvalidExpense {
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        LedgerError::AmountOverflow {
            context: context.into(),
        }
    }
}
