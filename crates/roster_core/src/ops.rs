//! Partition mutations driven by operator gestures.
//!
//! Every function takes the latest partition by reference and returns a new,
//! normalized one. Invalid requests (self-merge, merging into the same group,
//! unknown target group) are no-ops that return the input unchanged; nothing
//! here fails.

use crate::models::{PlayerName, Roster};
use crate::partition::{normalize, normalize_for_roster, GroupKey, Partition};

/// Drop `source` onto player `target`.
///
/// - `target` ungrouped: `source` leaves its group and pairs with `target`.
/// - `target` grouped: `source` leaves its group and joins `target`'s.
///
/// A group left with a single member is dissolved.
pub fn merge_player_into_player(partition: &Partition, source: &str, target: &str) -> Partition {
    if source.is_empty() || target.is_empty() || source == target {
        return partition.clone();
    }

    let source_idx = partition.index_of(source);
    let target_idx = partition.index_of(target);
    if source_idx.is_some() && source_idx == target_idx {
        return partition.clone();
    }

    let mut raw = remove_from_group(partition, source).to_raw();
    match target_idx {
        None => raw.push(vec![source.to_owned(), target.to_owned()]),
        Some(_) => {
            if let Some(group) = raw.iter_mut().find(|g| g.iter().any(|m| m == target)) {
                group.push(source.to_owned());
            }
        }
    }

    log::debug!("Merged {} into {}", source, target);
    normalize(raw)
}

/// Drop `source` onto the group identified by `target_key`.
pub fn merge_player_into_group(
    partition: &Partition,
    source: &str,
    target_key: &GroupKey,
) -> Partition {
    if source.is_empty() {
        return partition.clone();
    }

    match partition.find(target_key) {
        Some(group) if !group.contains(source) => {}
        _ => return partition.clone(),
    }

    // `source` is not in the target group, so removing it leaves the key intact.
    let mut raw = remove_from_group(partition, source).to_raw();
    if let Some(group) = raw.iter_mut().find(|g| GroupKey::from_members(g.iter()) == *target_key) {
        group.push(source.to_owned());
    }

    log::debug!("Merged {} into group {}", source, target_key);
    normalize(raw)
}

/// Take `source` out of its group, dissolving the group if one member remains.
pub fn remove_from_group(partition: &Partition, source: &str) -> Partition {
    if !partition.is_grouped(source) {
        return partition.clone();
    }

    let raw = partition
        .groups()
        .iter()
        .map(|g| g.members().iter().filter(|m| *m != source).cloned().collect::<Vec<_>>());
    normalize(raw)
}

/// Substitute `replacement` for `current` after a roster swap.
///
/// Names that are no longer on `roster` are dropped, and so is a duplicate
/// created when the replacement was already in the same group.
pub fn rename_player(
    partition: &Partition,
    current: &str,
    replacement: &str,
    roster: &Roster,
) -> Partition {
    if current.is_empty() || replacement.is_empty() || current == replacement {
        return partition.retain_roster(roster);
    }

    let raw = partition.groups().iter().map(|g| {
        g.members()
            .iter()
            .map(|m| if m == current { replacement.to_owned() } else { m.clone() })
            .collect::<Vec<PlayerName>>()
    });
    normalize_for_roster(raw, roster)
}

/// Apply the same roster swap to decoupling pairs.
///
/// Decouplings may share players, so entries are cleaned one at a time
/// instead of through [`normalize`].
pub fn rename_in_decouplings(
    decouplings: &[Vec<PlayerName>],
    current: &str,
    replacement: &str,
    roster: &Roster,
) -> Vec<Vec<PlayerName>> {
    decouplings
        .iter()
        .filter_map(|entry| {
            let mut members: Vec<PlayerName> = Vec::with_capacity(entry.len());
            for name in entry.iter().map(String::as_str) {
                let name = if name == current && !replacement.is_empty() { replacement } else { name };
                if roster.contains(name) && !members.iter().any(|m| m == name) {
                    members.push(name.to_owned());
                }
            }
            (members.len() >= 2).then_some(members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, RosterMember};

    fn groups(raw: &[&[&str]]) -> Partition {
        normalize(raw.iter().map(|g| g.iter().copied()))
    }

    #[test]
    fn test_merge_into_ungrouped_target_forms_pair() {
        let p = groups(&[]);
        let next = merge_player_into_player(&p, "A", "B");
        assert_eq!(next.to_raw(), vec![vec!["A", "B"]]);
    }

    #[test]
    fn test_merge_extends_target_group() {
        let p = groups(&[&["A", "B"]]);
        let next = merge_player_into_player(&p, "C", "A");
        assert_eq!(next.to_raw(), vec![vec!["A", "B", "C"]]);
    }

    #[test]
    fn test_merge_moves_source_and_dissolves_old_group() {
        let p = groups(&[&["A", "B"], &["C", "D"]]);
        let next = merge_player_into_player(&p, "B", "C");
        assert_eq!(next.to_raw(), vec![vec!["C", "D", "B"]]);
        assert!(!next.is_grouped("A"));
    }

    #[test]
    fn test_merge_grouped_source_onto_free_target() {
        let p = groups(&[&["A", "B", "C"]]);
        let next = merge_player_into_player(&p, "C", "D");
        assert_eq!(next.to_raw(), vec![vec!["A", "B"], vec!["C", "D"]]);
    }

    #[test]
    fn test_merge_noops() {
        let p = groups(&[&["A", "B"], &["C", "D"]]);
        assert_eq!(merge_player_into_player(&p, "A", "A"), p);
        assert_eq!(merge_player_into_player(&p, "", "A"), p);
        assert_eq!(merge_player_into_player(&p, "A", ""), p);
        assert_eq!(merge_player_into_player(&p, "A", "B"), p);
        assert_eq!(merge_player_into_player(&p, "B", "A"), p);
    }

    #[test]
    fn test_merge_into_group_appends_source() {
        let p = groups(&[&["A", "B"], &["C", "D"]]);
        let key = GroupKey::from_members(["D", "C"]);
        let next = merge_player_into_group(&p, "A", &key);
        assert_eq!(next.to_raw(), vec![vec!["C", "D", "A"]]);
    }

    #[test]
    fn test_merge_into_group_from_singleton() {
        let p = groups(&[&["A", "B"]]);
        let next = merge_player_into_group(&p, "E", &GroupKey::new("A|B"));
        assert_eq!(next.to_raw(), vec![vec!["A", "B", "E"]]);
    }

    #[test]
    fn test_merge_into_group_noops() {
        let p = groups(&[&["A", "B"]]);
        assert_eq!(merge_player_into_group(&p, "A", &GroupKey::new("A|B")), p);
        assert_eq!(merge_player_into_group(&p, "C", &GroupKey::new("A|C")), p);
        assert_eq!(merge_player_into_group(&p, "", &GroupKey::new("A|B")), p);
    }

    #[test]
    fn test_remove_from_three_keeps_pair() {
        let p = groups(&[&["A", "B", "C"]]);
        let next = remove_from_group(&p, "B");
        assert_eq!(next.to_raw(), vec![vec!["A", "C"]]);
    }

    #[test]
    fn test_remove_from_pair_dissolves() {
        let p = groups(&[&["A", "B"], &["C", "D"]]);
        let next = remove_from_group(&p, "A");
        assert_eq!(next.to_raw(), vec![vec!["C", "D"]]);
        assert!(!next.is_grouped("B"));
    }

    #[test]
    fn test_remove_ungrouped_is_noop() {
        let p = groups(&[&["A", "B"]]);
        assert_eq!(remove_from_group(&p, "Z"), p);
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let p = groups(&[&["A", "B"], &["C", "D"]]);
        let before = p.clone();
        let _ = merge_player_into_player(&p, "B", "C");
        let _ = remove_from_group(&p, "A");
        assert_eq!(p, before);
    }

    #[test]
    fn test_rename_player_substitutes_and_filters() {
        let roster = Roster::new(
            ["A", "X", "C", "D"].iter().map(|n| RosterMember::new(*n, Role::ALL)).collect(),
        );
        let p = groups(&[&["A", "B"], &["C", "D", "Gone"]]);
        let next = rename_player(&p, "B", "X", &roster);
        assert_eq!(next.to_raw(), vec![vec!["A", "X"], vec!["C", "D"]]);
    }

    #[test]
    fn test_rename_in_decouplings_keeps_overlap() {
        let roster = Roster::new(
            ["A", "C", "E"].iter().map(|n| RosterMember::new(*n, Role::ALL)).collect(),
        );
        let decouplings = vec![
            vec!["A".to_string(), "B".to_string()],
            vec!["A".to_string(), "C".to_string()],
            vec!["B".to_string(), "Gone".to_string()],
        ];

        let next = rename_in_decouplings(&decouplings, "B", "E", &roster);
        assert_eq!(next, vec![vec!["A", "E"], vec!["A", "C"]]);
    }

    #[test]
    fn test_rename_into_existing_member_collapses() {
        let roster = Roster::new(
            ["A", "C"].iter().map(|n| RosterMember::new(*n, Role::ALL)).collect(),
        );
        let p = groups(&[&["A", "B", "C"]]);
        let next = rename_player(&p, "B", "A", &roster);
        assert_eq!(next.to_raw(), vec![vec!["A", "C"]]);
    }

    mod proptests {
        use super::*;
        use crate::partition::strategies::raw_groups;
        use proptest::prelude::*;

        proptest! {
            /// Property: dropping a player onto itself changes nothing
            #[test]
            fn prop_self_merge_is_identity(
                raw in raw_groups(),
                name in prop::sample::select(vec!["A", "B", "E", "H", "Z"]),
            ) {
                let partition = normalize(&raw);
                prop_assert_eq!(merge_player_into_player(&partition, name, name), partition);
            }
        }
    }
}
