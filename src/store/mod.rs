//! Persistence collaborator for the settlement pipeline.
//!
//! The pipeline only needs a read-consistent snapshot of a group's members
//! and expenses. Stores are passed explicitly to every call.

pub mod memory;

use crate::core::expense::Expense;
use crate::core::group::{Group, GroupId};
use crate::core::member::Member;
use crate::error::Result;

pub use memory::InMemoryStore;

/// Read access to a group's data.
///
/// Implementations must return members and expenses from the same point in
/// time (one transaction or equivalent isolation).
pub trait LedgerStore {
    fn group(&self, group: GroupId) -> Result<Group>;

    /// Members of the group, in a stable order.
    fn list_members(&self, group: GroupId) -> Result<Vec<Member>>;

    fn list_expenses(&self, group: GroupId) -> Result<Vec<Expense>>;
}
