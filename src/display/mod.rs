//! Display formatting for terminal output
//!
//! Turns groups, entries, balances and settlements into aligned plain-text
//! tables. Formatters return strings; printing is left to the CLI layer.

pub mod balance;
pub mod entry;
pub mod group;
pub mod settlement;

pub use balance::{format_balance_table, format_position};
pub use entry::{format_entry_details, format_entry_list};
pub use group::{format_group_list, format_roster};
pub use settlement::{format_settlement_list, format_suggestions};

/// Shorten `s` to at most `max_len` characters, marking the cut with "..."
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
