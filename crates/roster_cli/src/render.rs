use roster_core::{DisplayItem, RoleLine, RosterMember};
use std::fmt::Write;

/// Plain-text layout: one block per non-empty role line.
pub fn role_lines(lines: &[RoleLine]) -> String {
    let mut out = String::new();

    for line in lines.iter().filter(|l| !l.items.is_empty()) {
        let _ = writeln!(out, "{}:", line.role);
        for item in &line.items {
            match item {
                DisplayItem::Player(member) => {
                    let _ = writeln!(out, "  {}", member_label(member));
                }
                DisplayItem::Group { members, .. } => {
                    let labels: Vec<String> = members.iter().map(member_label).collect();
                    let _ = writeln!(out, "  [{}]", labels.join(" + "));
                }
            }
        }
    }

    out
}

fn member_label(member: &RosterMember) -> String {
    let mut label = format!("{} ({:.1})", member.name, member.average_rating);
    if member.is_guest {
        label.push_str(" *guest");
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{normalize, project, Role, Roster};

    #[test]
    fn test_role_lines_text() {
        let roster = Roster::new(vec![
            RosterMember::new("Avi", Role::GK).with_rating(6.0),
            RosterMember::new("Ben", Role::ATT).with_rating(7.4),
            RosterMember::new("Gil", Role::ATT).with_rating(5.5).guest(),
        ]);
        let lines = project(&roster, &normalize(vec![vec!["Gil", "Ben"]]));

        assert_eq!(
            role_lines(&lines),
            "GK:\n  Avi (6.0)\nATT:\n  [Ben (7.4) + Gil (5.5) *guest]\n"
        );
    }
}
