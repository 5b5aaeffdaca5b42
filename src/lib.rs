//! # split-ledger
//!
//! Shared-expense ledger: members of a group record expenses with arbitrary
//! payer splits, and the ledger computes each member's net balance and a
//! short list of payments that settles everyone.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: members, groups, expenses, balances, payments
//! - **settlement** — Balance aggregation, greedy settlement planning, JSON summary
//! - **store** — Snapshot interface to persistence plus an in-memory store
//! - **simulation** — Random group generation for stress tests and benchmarks

pub mod core;
pub mod error;
pub mod settlement;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::Balances;
    pub use crate::core::expense::{CreditorShare, Expense, ExpenseId, NewExpense};
    pub use crate::core::group::{Group, GroupId};
    pub use crate::core::member::{Member, MemberId};
    pub use crate::core::payment::Payment;
    pub use crate::error::{LedgerError, Result};
    pub use crate::settlement::aggregator::BalanceAggregator;
    pub use crate::settlement::planner::{PlannerConfig, SettlementPlanner};
    pub use crate::settlement::summary::{summarize_group, GroupSummary, PaymentSummary};
    pub use crate::store::{InMemoryStore, LedgerStore};
}
