//! Balance CLI command
//!
//! Shows who owes what in a group, optionally from one member's point of
//! view. The point of view only changes presentation.

use clap::Args;

use super::resolve_group;
use crate::config::settings::Settings;
use crate::display::balance::{format_balance_table, format_position};
use crate::error::{TallyError, TallyResult};
use crate::services::{BalanceService, GroupService};
use crate::storage::Storage;

/// Arguments for `tally balance`
#[derive(Args)]
pub struct BalanceArgs {
    /// Group name or ID
    pub group: String,
    /// Show balances from this member's point of view
    #[arg(long = "as", value_name = "MEMBER")]
    pub acting: Option<String>,
}

/// Handle the balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    args: BalanceArgs,
) -> TallyResult<()> {
    let group = resolve_group(storage, &args.group)?;
    let roster = GroupService::new(storage).roster(group.id)?;
    let summaries = BalanceService::new(storage).summaries(group.id)?;
    let symbol = settings.currency_symbol.as_str();

    // An unknown configured name is ignored; an explicit --as must resolve
    let acting = match args.acting.as_deref() {
        Some(name) => Some(
            roster
                .find(name)
                .ok_or_else(|| TallyError::participant_reference(name))?,
        ),
        None => settings
            .acting_participant
            .as_deref()
            .and_then(|name| roster.find(name)),
    };

    println!("Balances for {}", group.name);
    println!();
    print!(
        "{}",
        format_balance_table(&summaries, &roster, acting.map(|p| p.id), symbol)
    );

    if let Some(participant) = acting {
        let balance = summaries
            .iter()
            .find(|s| s.participant_id == participant.id)
            .map(|s| s.balance)
            .unwrap_or_default();
        println!();
        println!("{}", format_position(&participant.name, balance, symbol));
    }

    Ok(())
}
