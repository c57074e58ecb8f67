//! Group display formatting

use crate::models::Roster;

/// Format groups with their member counts as a table
pub fn format_group_list(rosters: &[Roster]) -> String {
    if rosters.is_empty() {
        return "No groups found.\n".to_string();
    }

    let name_width = rosters
        .iter()
        .map(|r| r.group.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:<12}  {}\n",
        "Name",
        "Members",
        "ID",
        "Description",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:-<12}  {:-<11}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for roster in rosters {
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:<12}  {}\n",
            roster.group.name,
            roster.participants.len(),
            roster.group.id.to_string(),
            roster.group.description.as_deref().unwrap_or(""),
            name_width = name_width,
        ));
    }

    output
}

/// Format a group and its members
pub fn format_roster(roster: &Roster) -> String {
    let group = &roster.group;
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:      {}\n", group.id));
    if let Some(description) = &group.description {
        output.push_str(&format!("  About:   {}\n", description));
    }
    output.push_str(&format!(
        "  Created: {}\n",
        group.created_at.format("%Y-%m-%d")
    ));
    output.push('\n');

    if roster.participants.is_empty() {
        output.push_str("  No members yet. Add one with `tally member add`.\n");
        return output;
    }

    output.push_str(&format!("  Members ({}):\n", roster.participants.len()));
    for participant in &roster.participants {
        output.push_str(&format!("    {:<12}  {}\n", participant.id.to_string(), participant.name));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Participant};

    #[test]
    fn test_format_group_list() {
        let group = Group::with_description("Ski Trip", "Feb 2025");
        let members = vec![
            Participant::new(group.id, "Alice"),
            Participant::new(group.id, "Bob"),
        ];
        let formatted = format_group_list(&[Roster::new(group, members)]);

        assert!(formatted.contains("Ski Trip"));
        assert!(formatted.contains("Feb 2025"));
        assert!(formatted.lines().nth(2).unwrap().contains("  2  "));
    }

    #[test]
    fn test_format_empty() {
        assert!(format_group_list(&[]).contains("No groups found"));

        let roster = Roster::new(Group::new("Empty"), Vec::new());
        assert!(format_roster(&roster).contains("No members yet"));
    }

    #[test]
    fn test_format_roster_lists_members_in_order() {
        let group = Group::new("Flat");
        let members = vec![
            Participant::new(group.id, "Zoe"),
            Participant::new(group.id, "Adam"),
        ];
        let formatted = format_roster(&Roster::new(group, members));

        let zoe = formatted.find("Zoe").unwrap();
        let adam = formatted.find("Adam").unwrap();
        assert!(zoe < adam);
        assert!(formatted.contains("Members (2)"));
    }
}
