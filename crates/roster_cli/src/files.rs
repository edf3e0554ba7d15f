//! JSON inputs and outputs for the CLI.

use anyhow::{Context, Result};
use roster_core::{normalize_for_roster, Partition, PlayerName, Roster};
use std::fs;
use std::path::Path;

/// Read a roster file: a JSON array of `{name, position, averageRating, isGuest}`.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    let roster: Roster = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse roster JSON: {}", path.display()))?;
    Ok(roster)
}

/// Read a groups file (`[["A","B"], ...]`) and normalize it against `roster`.
///
/// A missing path means no groups yet.
pub fn load_groups(path: Option<&Path>, roster: &Roster) -> Result<Partition> {
    let Some(path) = path else {
        return Ok(Partition::empty());
    };

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read groups file: {}", path.display()))?;
    let raw: Vec<Vec<PlayerName>> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse groups JSON: {}", path.display()))?;
    Ok(normalize_for_roster(raw, roster))
}

pub fn save_groups(path: &Path, partition: &Partition) -> Result<()> {
    let json = serde_json::to_string_pretty(partition)?;
    fs::write(path, json).with_context(|| format!("Failed to write groups file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_groups_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let roster_path = dir.path().join("roster.json");
        let groups_path = dir.path().join("groups.json");

        fs::write(
            &roster_path,
            r#"[{"name":"A","position":"GK"},{"name":"B","position":"DEF"},{"name":"C"}]"#,
        )
        .unwrap();
        fs::write(&groups_path, r#"[["A","B","Gone"],["C"]]"#).unwrap();

        let roster = load_roster(&roster_path).unwrap();
        let partition = load_groups(Some(&groups_path), &roster).unwrap();
        assert_eq!(partition.to_raw(), vec![vec!["A", "B"]]);

        save_groups(&groups_path, &partition).unwrap();
        let reloaded = load_groups(Some(&groups_path), &roster).unwrap();
        assert_eq!(reloaded, partition);
    }

    #[test]
    fn test_missing_groups_path_is_empty() {
        let roster = Roster::default();
        assert!(load_groups(None, &roster).unwrap().is_empty());
    }

    #[test]
    fn test_bad_roster_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roster.json");
        fs::write(&path, "{not json").unwrap();

        let err = load_roster(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("roster.json"));
    }
}
