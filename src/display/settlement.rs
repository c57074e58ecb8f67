//! Settlement display formatting

use crate::engine::{SettlementStrategy, SuggestedTransfer};
use crate::models::{Roster, Settlement};

/// Format suggested transfers, one per line
///
/// A non-zero strategy tolerance is spelled out, since balances inside it
/// are left as they are.
pub fn format_suggestions(
    transfers: &[SuggestedTransfer],
    roster: &Roster,
    strategy: &dyn SettlementStrategy,
    symbol: &str,
) -> String {
    let mut output = if transfers.is_empty() {
        "Everyone is settled up.\n".to_string()
    } else {
        let mut output = format!(
            "Suggested settlements ({}, {} transfer{}):\n",
            strategy.name(),
            transfers.len(),
            if transfers.len() == 1 { "" } else { "s" }
        );
        for transfer in transfers {
            output.push_str(&format!(
                "  {} pays {} {}\n",
                roster.name_of(transfer.from),
                roster.name_of(transfer.to),
                transfer.amount.format_with_symbol(symbol)
            ));
        }
        output
    };

    let tolerance = strategy.tolerance();
    if !tolerance.is_zero() {
        output.push_str(&format!(
            "Balances within {} of zero are treated as settled and may remain.\n",
            tolerance.format_with_symbol(symbol)
        ));
    }

    output
}

/// Format recorded settlements as a table
pub fn format_settlement_list(settlements: &[Settlement], roster: &Roster, symbol: &str) -> String {
    if settlements.is_empty() {
        return "No settlements recorded.\n".to_string();
    }

    let name_width = roster
        .participants
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<name_width$}  {:<name_width$}  {:>12}  {}\n",
        "Date",
        "From",
        "To",
        "Amount",
        "Note",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<name_width$}  {:-<name_width$}  {:->12}  {:-<4}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for settlement in settlements {
        output.push_str(&format!(
            "{:<10}  {:<name_width$}  {:<name_width$}  {:>12}  {}\n",
            settlement.date.format("%Y-%m-%d").to_string(),
            roster.name_of(settlement.from_id),
            roster.name_of(settlement.to_id),
            settlement.amount.format_with_symbol(symbol),
            settlement.note,
            name_width = name_width,
        ));
    }

    output
}
