//! Role-bucketed roster layout.
//!
//! The roster is walked once in its own order. A coupling group is placed at
//! the position of its earliest member; later members of the same group are
//! skipped. Each resulting item then lands in exactly one role line.

use crate::models::{Role, Roster, RosterMember};
use crate::partition::{CouplingGroup, GroupKey, Partition};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One bubble in the roster layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayItem {
    Player(RosterMember),
    Group {
        key: GroupKey,
        /// Members in roster order.
        members: Vec<RosterMember>,
    },
}

impl DisplayItem {
    pub fn role(&self) -> Role {
        match self {
            DisplayItem::Player(member) => member.display_role(),
            DisplayItem::Group { members, .. } => resolve_group_role(members),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            DisplayItem::Player(member) => vec![member.name.as_str()],
            DisplayItem::Group { members, .. } => members.iter().map(|m| m.name.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleLine {
    pub role: Role,
    pub items: Vec<DisplayItem>,
}

/// Highest-priority role among `members` (GK > DEF > ATT > ALL).
///
/// Members without a recognized position are ignored; a group with none at
/// all resolves to [`Role::ALL`].
pub fn resolve_group_role(members: &[RosterMember]) -> Role {
    members.iter().filter_map(|m| m.position).min_by_key(|role| role.priority()).unwrap_or(Role::ALL)
}

/// Flat display list: groups collapsed into their earliest member's slot.
pub fn display_order(roster: &Roster, partition: &Partition) -> Vec<DisplayItem> {
    let partition = partition.retain_roster(roster);

    let group_by_name: HashMap<&str, (usize, &CouplingGroup)> = partition
        .groups()
        .iter()
        .enumerate()
        .flat_map(|(idx, group)| {
            group.members().iter().map(move |name| (name.as_str(), (idx, group)))
        })
        .collect();

    let mut emitted: HashSet<usize> = HashSet::new();
    let mut items = Vec::with_capacity(roster.len());

    for member in roster.members() {
        let Some(&(idx, group)) = group_by_name.get(member.name.as_str()) else {
            items.push(DisplayItem::Player(member.clone()));
            continue;
        };

        if !emitted.insert(idx) {
            continue;
        }

        let mut members: Vec<&RosterMember> =
            group.members().iter().filter_map(|name| roster.get(name)).collect();
        members.sort_by_key(|m| roster.position_of(&m.name));

        items.push(DisplayItem::Group {
            key: group.key().clone(),
            members: members.into_iter().cloned().collect(),
        });
    }

    items
}

/// Role lines GK, DEF, ATT, ALL (always all four, possibly empty).
pub fn project(roster: &Roster, partition: &Partition) -> Vec<RoleLine> {
    let mut lines: Vec<RoleLine> =
        Role::ORDER.iter().map(|&role| RoleLine { role, items: Vec::new() }).collect();

    for item in display_order(roster, partition) {
        let idx = item.role().priority() as usize;
        lines[idx].items.push(item);
    }

    lines
}
