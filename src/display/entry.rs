//! Ledger entry display formatting
//!
//! Register-style list of a group's entries and a detail view showing how
//! one entry was split.

use super::truncate;
use crate::models::{EntryKind, LedgerEntry, Roster};

const DESCRIPTION_WIDTH: usize = 24;

/// Format a group's entries as a register
pub fn format_entry_list(entries: &[LedgerEntry], roster: &Roster, symbol: &str) -> String {
    if entries.is_empty() {
        return "No entries found.\n".to_string();
    }

    let payer_width = roster
        .participants
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<10}  {:<8}  {:<desc$}  {:<payer_width$}  {:>12}\n",
        "ID",
        "Date",
        "Kind",
        "Description",
        "Paid by",
        "Amount",
        desc = DESCRIPTION_WIDTH,
        payer_width = payer_width,
    ));
    output.push_str(&"-".repeat(12 + 10 + 8 + DESCRIPTION_WIDTH + payer_width + 12 + 10));
    output.push('\n');

    for entry in entries {
        let description = match (entry.kind, entry.recipient()) {
            (EntryKind::Transfer, Some(to)) if entry.description.is_empty() => {
                format!("-> {}", roster.name_of(to))
            }
            _ => entry.description.clone(),
        };

        output.push_str(&format!(
            "{:<12}  {:<10}  {:<8}  {:<desc$}  {:<payer_width$}  {:>12}\n",
            entry.id.to_string(),
            entry.date.format("%Y-%m-%d").to_string(),
            entry.kind.to_string(),
            truncate(&description, DESCRIPTION_WIDTH),
            roster.name_of(entry.payer_id),
            entry.amount.format_with_symbol(symbol),
            desc = DESCRIPTION_WIDTH,
            payer_width = payer_width,
        ));
    }

    output
}

/// Format one entry with its splits
pub fn format_entry_details(entry: &LedgerEntry, roster: &Roster, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Entry: {}\n", entry.id));
    output.push_str(&format!("Date:        {}\n", entry.date.format("%Y-%m-%d")));
    output.push_str(&format!("Kind:        {}\n", entry.kind));
    output.push_str(&format!(
        "Amount:      {}\n",
        entry.amount.format_with_symbol(symbol)
    ));
    let payer_label = match entry.kind {
        EntryKind::Income => "Received by",
        _ => "Paid by",
    };
    output.push_str(&format!(
        "{:<12} {}\n",
        format!("{}:", payer_label),
        roster.name_of(entry.payer_id)
    ));
    if !entry.description.is_empty() {
        output.push_str(&format!("Description: {}\n", entry.description));
    }

    if let Some(to) = entry.recipient() {
        output.push_str(&format!("Recipient:   {}\n", roster.name_of(to)));
        return output;
    }

    output.push_str(&format!("Split:       {}\n", entry.policy));
    for split in &entry.splits {
        let input = match (split.custom_amount, split.weight) {
            (_, Some(weight)) => format!("  (weight {})", weight),
            (Some(amount), None) if amount != split.amount => {
                format!("  (asked {})", amount.format_with_symbol(symbol))
            }
            _ => String::new(),
        };
        output.push_str(&format!(
            "  {:<20} {:>12}{}\n",
            roster.name_of(split.participant_id),
            split.amount.format_with_symbol(symbol),
            input
        ));
    }

    output
}
