//! Coupling groups and the partition they form.
//!
//! A [`Partition`] is an immutable value: every operation in [`crate::ops`]
//! derives a new one. The only way to build a partition is through
//! [`normalize`], so a `Partition` always satisfies:
//! - no player belongs to two groups
//! - every group has at least two distinct, non-empty members

mod normalize;

pub use normalize::{normalize, normalize_for_roster};

use crate::models::{PlayerName, Roster};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Canonical identity of a coupling group.
///
/// Independent of member order: members are sorted and joined with
/// [`GroupKey::SEPARATOR`]. A backslash or `|` inside a name is escaped
/// with a backslash first, so distinct groups never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub const SEPARATOR: &'static str = "|";
    const ESCAPE: char = '\\';

    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> =
            members.into_iter().map(|name| name.as_ref().to_owned()).collect();
        names.sort();
        let escaped: Vec<String> = names.iter().map(|name| Self::escape(name)).collect();
        GroupKey(escaped.join(Self::SEPARATOR))
    }

    fn escape(name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        for c in name.chars() {
            if c == Self::ESCAPE || Self::SEPARATOR.starts_with(c) {
                out.push(Self::ESCAPE);
            }
            out.push(c);
        }
        out
    }

    /// Wrap a key string received from the rendering layer.
    pub fn new(raw: impl Into<String>) -> Self {
        GroupKey(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of players that must end up on the same drawn team.
///
/// Members keep their insertion order; identity is the order-free [`GroupKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouplingGroup {
    members: Vec<PlayerName>,
    key: GroupKey,
}

impl CouplingGroup {
    /// Caller guarantees at least two distinct, non-empty members.
    fn from_normalized(members: Vec<PlayerName>) -> Self {
        debug_assert!(members.len() >= 2);
        let key = GroupKey::from_members(&members);
        Self { members, key }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn members(&self) -> &[PlayerName] {
        &self.members
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m == name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false for a normalized group; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl AsRef<[PlayerName]> for CouplingGroup {
    fn as_ref(&self) -> &[PlayerName] {
        &self.members
    }
}

impl Serialize for CouplingGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.members.serialize(serializer)
    }
}

/// Disjoint collection of coupling groups over the active roster.
///
/// Players outside every group are implicit singletons. Serializes as the
/// plain list-of-lists the constraint store speaks; deserializing runs the
/// input through [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<PlayerName>>", into = "Vec<Vec<PlayerName>>")]
pub struct Partition {
    groups: Vec<CouplingGroup>,
}

impl Partition {
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_normalized(groups: Vec<CouplingGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[CouplingGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index of the group holding `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(name))
    }

    pub fn group_of(&self, name: &str) -> Option<&CouplingGroup> {
        self.groups.iter().find(|g| g.contains(name))
    }

    pub fn find(&self, key: &GroupKey) -> Option<&CouplingGroup> {
        self.groups.iter().find(|g| g.key() == key)
    }

    pub fn is_grouped(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Plain member lists, in group order.
    pub fn to_raw(&self) -> Vec<Vec<PlayerName>> {
        self.groups.iter().map(|g| g.members.clone()).collect()
    }

    /// Drop members that left the roster, and any group that shrinks below two.
    pub fn retain_roster(&self, roster: &Roster) -> Partition {
        normalize_for_roster(self.to_raw(), roster)
    }
}

impl From<Vec<Vec<PlayerName>>> for Partition {
    fn from(raw: Vec<Vec<PlayerName>>) -> Self {
        normalize(raw)
    }
}

impl From<Partition> for Vec<Vec<PlayerName>> {
    fn from(partition: Partition) -> Self {
        partition.groups.into_iter().map(|g| g.members).collect()
    }
}
