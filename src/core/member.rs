use crate::core::group::GroupId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a member, unique within its group.
///
/// # Examples
///
/// ```
/// use split_ledger::core::member::MemberId;
///
/// let alice = MemberId::new(1);
/// let bob = MemberId::new(2);
/// assert_ne!(alice, bob);
/// assert!(alice < bob);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u64);

impl MemberId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// A participant in a group's shared expenses.
///
/// Two members are the same member when their ids match; the display
/// name is presentation data and may change through a rename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    group_id: GroupId,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>, group_id: GroupId) -> Self {
        Self {
            id,
            name: name.into(),
            group_id,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_member_equality_is_by_id() {
        let group = GroupId::new();
        let a = Member::new(MemberId::new(1), "alice", group);
        let renamed = Member::new(MemberId::new(1), "alicia", group);
        let b = Member::new(MemberId::new(2), "alice", group);
        assert_eq!(a, renamed);
        assert_ne!(a, b);
    }

    #[test]
    fn test_member_hash_follows_id() {
        let group = GroupId::new();
        let mut set = HashSet::new();
        set.insert(Member::new(MemberId::new(1), "alice", group));
        set.insert(Member::new(MemberId::new(1), "alicia", group));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_member_display() {
        let m = Member::new(MemberId::new(7), "carol", GroupId::new());
        assert_eq!(format!("{}", m), "carol");
        assert_eq!(format!("{}", m.id()), "#7");
    }
}
