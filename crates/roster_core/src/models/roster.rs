use super::player::{PlayerName, RosterMember};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ordered list of players registered for a matchday.
///
/// Names are unique: when the source list repeats a name, the first entry
/// wins and later ones are dropped with a warning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<RosterMember>", into = "Vec<RosterMember>")]
pub struct Roster {
    members: Vec<RosterMember>,
    index: HashMap<PlayerName, usize>,
}

impl Roster {
    pub fn new(members: Vec<RosterMember>) -> Self {
        let mut kept = Vec::with_capacity(members.len());
        let mut index = HashMap::with_capacity(members.len());

        for member in members {
            if index.contains_key(&member.name) {
                log::warn!("Duplicate roster entry dropped: {}", member.name);
                continue;
            }
            index.insert(member.name.clone(), kept.len());
            kept.push(member);
        }

        Self { members: kept, index }
    }

    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    /// Player names in roster order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members.iter().map(|m| m.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&RosterMember> {
        self.index.get(name).map(|&idx| &self.members[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Zero-based roster order of `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl From<Vec<RosterMember>> for Roster {
    fn from(members: Vec<RosterMember>) -> Self {
        Self::new(members)
    }
}

impl From<Roster> for Vec<RosterMember> {
    fn from(roster: Roster) -> Self {
        roster.members
    }
}

/// A single day's match event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchday {
    pub date: NaiveDate,
    pub roster: Roster,
}

impl Matchday {
    pub fn new(date: NaiveDate, roster: Roster) -> Self {
        Self { date, roster }
    }

    /// A matchday only stays active on its own date.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}
