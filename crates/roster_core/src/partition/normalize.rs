use super::{CouplingGroup, Partition};
use crate::models::{PlayerName, Roster};
use std::collections::HashSet;

/// Restore partition invariants on a raw list of groups.
///
/// - members are deduplicated within a group (first occurrence kept)
/// - empty names are dropped
/// - a player already claimed by an earlier group is dropped from later ones
/// - groups left with fewer than two members are dropped
///
/// Idempotent: normalizing a normalized partition returns it unchanged.
pub fn normalize<R, G, S>(raw: R) -> Partition
where
    R: IntoIterator<Item = G>,
    G: IntoIterator<Item = S>,
    S: Into<PlayerName>,
{
    let mut claimed: HashSet<PlayerName> = HashSet::new();
    let mut groups = Vec::new();

    for entry in raw {
        let mut members: Vec<PlayerName> = Vec::new();
        for name in entry {
            let name = name.into();
            if name.is_empty() || members.contains(&name) {
                continue;
            }
            if claimed.contains(&name) {
                log::debug!("Player {} already coupled elsewhere, dropped from later group", name);
                continue;
            }
            members.push(name);
        }

        if members.len() < 2 {
            continue;
        }
        claimed.extend(members.iter().cloned());
        groups.push(CouplingGroup::from_normalized(members));
    }

    Partition::from_normalized(groups)
}

/// [`normalize`] restricted to players present in `roster`.
///
/// Stale names are removed before the size check, so a group that only
/// survives because of a departed player is dissolved.
pub fn normalize_for_roster<R, G, S>(raw: R, roster: &Roster) -> Partition
where
    R: IntoIterator<Item = G>,
    G: IntoIterator<Item = S>,
    S: Into<PlayerName>,
{
    let filtered: Vec<Vec<PlayerName>> = raw
        .into_iter()
        .map(|entry| {
            entry
                .into_iter()
                .map(Into::into)
                .filter(|name: &PlayerName| {
                    let present = roster.contains(name);
                    if !present && !name.is_empty() {
                        log::warn!("Dropping stale coupling member not on roster: {}", name);
                    }
                    present
                })
                .collect()
        })
        .collect();

    normalize(filtered)
}
