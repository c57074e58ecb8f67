//! Balance display formatting
//!
//! Positive balances are owed to the participant, negative ones are owed by
//! them. When an acting participant is given, their row is marked and a
//! one-line summary of their position is available.

use crate::engine::ParticipantSummary;
use crate::models::{Money, ParticipantId, Roster};

/// Format per-participant balances as a table
pub fn format_balance_table(
    summaries: &[ParticipantSummary],
    roster: &Roster,
    acting: Option<ParticipantId>,
    symbol: &str,
) -> String {
    if summaries.is_empty() {
        return "No members in this group.\n".to_string();
    }

    let name_width = summaries
        .iter()
        .map(|s| roster.name_of(s.participant_id).chars().count() + 2)
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>11}  {:>11}  {:>11}  {:>11}  {:>11}  {}\n",
        "Name",
        "Paid",
        "Share",
        "Sent",
        "Received",
        "Balance",
        "Status",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->11}  {:->11}  {:->11}  {:->11}  {:->11}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for summary in summaries {
        let marker = if Some(summary.participant_id) == acting {
            "* "
        } else {
            "  "
        };
        let status = if summary.balance.is_positive() {
            "gets back"
        } else if summary.balance.is_negative() {
            "owes"
        } else {
            "settled"
        };

        output.push_str(&format!(
            "{:<name_width$}  {:>11}  {:>11}  {:>11}  {:>11}  {:>11}  {}\n",
            format!("{}{}", marker, roster.name_of(summary.participant_id)),
            (summary.paid + summary.collected).format_with_symbol(symbol),
            summary.share.format_with_symbol(symbol),
            summary.sent.format_with_symbol(symbol),
            summary.received.format_with_symbol(symbol),
            summary.balance.format_with_symbol(symbol),
            status,
            name_width = name_width,
        ));
    }

    output
}

/// One line describing where `name` stands
pub fn format_position(name: &str, balance: Money, symbol: &str) -> String {
    if balance.is_positive() {
        format!("{} is owed {} in total.", name, balance.format_with_symbol(symbol))
    } else if balance.is_negative() {
        format!(
            "{} owes {} in total.",
            name,
            balance.abs().format_with_symbol(symbol)
        )
    } else {
        format!("{} is settled up.", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Participant};

    fn summary(participant_id: ParticipantId, paid: i64, share: i64) -> ParticipantSummary {
        ParticipantSummary {
            participant_id,
            paid: Money::from_cents(paid),
            collected: Money::zero(),
            share: Money::from_cents(share),
            sent: Money::zero(),
            received: Money::zero(),
            balance: Money::from_cents(paid - share),
        }
    }

    #[test]
    fn test_format_balance_table_marks_acting_participant() {
        let group = Group::new("Trip");
        let alice = Participant::new(group.id, "Alice");
        let bob = Participant::new(group.id, "Bob");
        let summaries = vec![summary(alice.id, 6000, 3000), summary(bob.id, 0, 3000)];
        let acting = Some(bob.id);
        let roster = Roster::new(group, vec![alice, bob]);

        let formatted = format_balance_table(&summaries, &roster, acting, "$");
        let lines: Vec<_> = formatted.lines().collect();

        assert!(lines[2].starts_with("  Alice"));
        assert!(lines[2].contains("$30.00"));
        assert!(lines[2].ends_with("gets back"));
        assert!(lines[3].starts_with("* Bob"));
        assert!(lines[3].contains("-$30.00"));
        assert!(lines[3].ends_with("owes"));
    }

    #[test]
    fn test_format_position() {
        assert_eq!(
            format_position("Alice", Money::from_cents(6667), "$"),
            "Alice is owed $66.67 in total."
        );
        assert_eq!(
            format_position("Bob", Money::from_cents(-3334), "$"),
            "Bob owes $33.34 in total."
        );
        assert_eq!(
            format_position("Carol", Money::zero(), "$"),
            "Carol is settled up."
        );
    }
}
