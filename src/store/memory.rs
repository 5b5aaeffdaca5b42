use crate::core::expense::{Expense, ExpenseId, NewExpense};
use crate::core::group::{Group, GroupId};
use crate::core::member::{Member, MemberId};
use crate::error::{LedgerError, Result};
use crate::store::LedgerStore;
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct GroupRecord {
    group: Group,
    members: IndexMap<MemberId, Member>,
    expenses: IndexMap<ExpenseId, Expense>,
}

/// In-memory store holding groups, their members and their expenses.
///
/// Member and expense ids are allocated from store-wide counters, so an id
/// is never reused, even after the record it named has been removed.
///
/// # Examples
///
/// ```
/// use split_ledger::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut store = InMemoryStore::new();
/// let trip = store.create_group("Trip");
/// let alice = store.add_member(trip, "alice").unwrap();
/// let bob = store.add_member(trip, "bob").unwrap();
///
/// store
///     .add_expense(
///         trip,
///         NewExpense::new("Fuel", dec!(80), vec![CreditorShare::new(alice, dec!(80))], vec![alice, bob]),
///     )
///     .unwrap();
///
/// let summary = summarize_group(&store, trip, &SettlementPlanner::default()).unwrap();
/// assert_eq!(summary.payments.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    groups: HashMap<GroupId, GroupRecord>,
    next_member_id: u64,
    next_expense_id: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group and return its id.
    pub fn create_group(&mut self, name: impl Into<String>) -> GroupId {
        let group = Group::new(name);
        let id = group.id();
        debug!("Created group {} ({})", id, group.name());
        self.groups.insert(
            id,
            GroupRecord {
                group,
                members: IndexMap::new(),
                expenses: IndexMap::new(),
            },
        );
        id
    }

    /// Remove a group together with all of its members and expenses.
    pub fn remove_group(&mut self, group: GroupId) -> Result<()> {
        let record = self
            .groups
            .remove(&group)
            .ok_or(LedgerError::GroupNotFound(group))?;
        debug!(
            "Removed group {} with {} members and {} expenses",
            group,
            record.members.len(),
            record.expenses.len()
        );
        Ok(())
    }

    /// Add a member; names are unique within a group.
    pub fn add_member(&mut self, group: GroupId, name: impl Into<String>) -> Result<MemberId> {
        let name = name.into();
        let record = self.record(group)?;
        ensure_unique_name(record, group, &name, None)?;

        self.next_member_id += 1;
        let id = MemberId::new(self.next_member_id);
        let record = self.record_mut(group)?;
        record.members.insert(id, Member::new(id, name, group));
        Ok(id)
    }

    pub fn rename_member(
        &mut self,
        group: GroupId,
        member: MemberId,
        new_name: impl Into<String>,
    ) -> Result<()> {
        let new_name = new_name.into();
        let record = self.record(group)?;
        ensure_unique_name(record, group, &new_name, Some(member))?;

        let record = self.record_mut(group)?;
        let entry = record
            .members
            .get_mut(&member)
            .ok_or(LedgerError::MemberNotFound { group, member })?;
        entry.set_name(new_name);
        Ok(())
    }

    /// Remove a member. Refused while any expense names them as a creditor
    /// or debtor.
    pub fn remove_member(&mut self, group: GroupId, member: MemberId) -> Result<()> {
        let record = self.record_mut(group)?;
        if !record.members.contains_key(&member) {
            return Err(LedgerError::MemberNotFound { group, member });
        }
        if let Some(expense) = record.expenses.values().find(|e| e.references(member)) {
            warn!(
                "Cannot remove member {} from group {}: used by expense {}",
                member,
                group,
                expense.id()
            );
            return Err(LedgerError::MemberInUse {
                member,
                expense: expense.id(),
            });
        }
        record.members.shift_remove(&member);
        Ok(())
    }

    /// Record a new expense. Every referenced member must belong to the group.
    pub fn add_expense(&mut self, group: GroupId, new_expense: NewExpense) -> Result<ExpenseId> {
        let id = ExpenseId::new(self.next_expense_id + 1);
        let expense = new_expense.into_expense(id, group)?;
        ensure_members_known(self.record(group)?, &expense)?;

        self.next_expense_id += 1;
        self.record_mut(group)?.expenses.insert(id, expense);
        Ok(id)
    }

    /// Replace description, amount, creditors and debtors of an expense.
    pub fn update_expense(
        &mut self,
        group: GroupId,
        expense: ExpenseId,
        replacement: NewExpense,
    ) -> Result<()> {
        let record = self.record(group)?;
        if !record.expenses.contains_key(&expense) {
            return Err(LedgerError::ExpenseNotFound { group, expense });
        }
        let updated = replacement.into_expense(expense, group)?;
        ensure_members_known(record, &updated)?;

        self.record_mut(group)?.expenses.insert(expense, updated);
        Ok(())
    }

    pub fn remove_expense(&mut self, group: GroupId, expense: ExpenseId) -> Result<()> {
        self.record_mut(group)?
            .expenses
            .shift_remove(&expense)
            .map(|_| ())
            .ok_or(LedgerError::ExpenseNotFound { group, expense })
    }

    pub fn expense(&self, group: GroupId, expense: ExpenseId) -> Result<Expense> {
        self.record(group)?
            .expenses
            .get(&expense)
            .cloned()
            .ok_or(LedgerError::ExpenseNotFound { group, expense })
    }

    /// Look up a member by display name.
    pub fn member_by_name(&self, group: GroupId, name: &str) -> Result<Option<Member>> {
        Ok(self
            .record(group)?
            .members
            .values()
            .find(|m| m.name() == name)
            .cloned())
    }

    fn record(&self, group: GroupId) -> Result<&GroupRecord> {
        self.groups
            .get(&group)
            .ok_or(LedgerError::GroupNotFound(group))
    }

    fn record_mut(&mut self, group: GroupId) -> Result<&mut GroupRecord> {
        self.groups
            .get_mut(&group)
            .ok_or(LedgerError::GroupNotFound(group))
    }
}

fn ensure_unique_name(
    record: &GroupRecord,
    group: GroupId,
    name: &str,
    except: Option<MemberId>,
) -> Result<()> {
    let taken = record
        .members
        .values()
        .any(|m| m.name() == name && Some(m.id()) != except);
    if taken {
        return Err(LedgerError::DuplicateMemberName {
            group,
            name: name.to_string(),
        });
    }
    Ok(())
}

fn ensure_members_known(record: &GroupRecord, expense: &Expense) -> Result<()> {
    match expense
        .members()
        .into_iter()
        .find(|m| !record.members.contains_key(m))
    {
        Some(unknown) => Err(LedgerError::UnknownMember(unknown)),
        None => Ok(()),
    }
}

impl LedgerStore for InMemoryStore {
    fn group(&self, group: GroupId) -> Result<Group> {
        Ok(self.record(group)?.group.clone())
    }

    fn list_members(&self, group: GroupId) -> Result<Vec<Member>> {
        Ok(self.record(group)?.members.values().cloned().collect())
    }

    fn list_expenses(&self, group: GroupId) -> Result<Vec<Expense>> {
        Ok(self.record(group)?.expenses.values().cloned().collect())
    }
}
