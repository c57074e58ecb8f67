//! Settle-up CLI commands
//!
//! `suggest` only prints. Nothing is written until `record` or `apply --yes`.

use clap::Subcommand;

use super::{parse_amount, parse_date, resolve_group, select_strategy};
use crate::config::settings::Settings;
use crate::display::settlement::{format_settlement_list, format_suggestions};
use crate::error::TallyResult;
use crate::services::{BalanceService, GroupService, ParticipantService, SettlementService};
use crate::storage::Storage;

/// Settle subcommands
#[derive(Subcommand)]
pub enum SettleCommands {
    /// Suggest transfers that would settle the group
    Suggest {
        /// Group name or ID
        group: String,
        /// Strategy (greedy, exact); defaults to the configured one
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Record a payment between two members
    Record {
        /// Group name or ID
        group: String,
        /// Amount paid
        amount: String,
        /// Who paid
        #[arg(long)]
        from: String,
        /// Who was paid
        #[arg(long)]
        to: String,
        /// Date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Note (e.g., "bank transfer")
        #[arg(short, long, default_value = "")]
        note: String,
    },
    /// List recorded settlements
    List {
        /// Group name or ID
        group: String,
    },
    /// Record every suggested transfer as a settlement
    Apply {
        /// Group name or ID
        group: String,
        /// Strategy (greedy, exact); defaults to the configured one
        #[arg(long)]
        strategy: Option<String>,
        /// Date to record the settlements on (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
        /// Actually record them
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle a settle command
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SettleCommands,
) -> TallyResult<()> {
    let balances = BalanceService::new(storage);
    let settlements = SettlementService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SettleCommands::Suggest { group, strategy } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let strategy = select_strategy(settings, strategy.as_deref())?;

            let (_, transfers) = balances.suggest(group.id, strategy.as_ref())?;
            print!(
                "{}",
                format_suggestions(&transfers, &roster, strategy.as_ref(), symbol)
            );
        }

        SettleCommands::Record {
            group,
            amount,
            from,
            to,
            date,
            note,
        } => {
            let group = resolve_group(storage, &group)?;
            let participants = ParticipantService::new(storage);
            let from = participants.resolve(group.id, &from)?;
            let to = participants.resolve(group.id, &to)?;

            let settlement = settlements.record(
                group.id,
                from.id,
                to.id,
                parse_amount(&amount)?,
                parse_date(date.as_deref())?,
                &note,
            )?;
            println!(
                "Recorded: {} paid {} {} ({})",
                from.name,
                to.name,
                settlement.amount.format_with_symbol(symbol),
                settlement.id
            );
        }

        SettleCommands::List { group } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let recorded = settlements.list(group.id)?;
            print!("{}", format_settlement_list(&recorded, &roster, symbol));
        }

        SettleCommands::Apply {
            group,
            strategy,
            date,
            yes,
        } => {
            let group = resolve_group(storage, &group)?;
            let roster = GroupService::new(storage).roster(group.id)?;
            let strategy = select_strategy(settings, strategy.as_deref())?;
            let date = parse_date(date.as_deref())?;

            let (_, transfers) = balances.suggest(group.id, strategy.as_ref())?;
            print!(
                "{}",
                format_suggestions(&transfers, &roster, strategy.as_ref(), symbol)
            );
            if transfers.is_empty() {
                return Ok(());
            }

            if !yes {
                println!();
                println!("Nothing recorded. Re-run with --yes to record these settlements.");
                return Ok(());
            }

            let recorded = settlements.record_suggestions(group.id, &transfers, date)?;
            println!();
            println!("Recorded {} settlement(s).", recorded.len());
        }
    }

    Ok(())
}
