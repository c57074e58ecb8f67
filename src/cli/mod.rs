//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod balance;
pub mod config;
pub mod entry;
pub mod export;
pub mod group;
pub mod member;
pub mod settle;

pub use audit::{handle_audit_command, AuditArgs};
pub use balance::{handle_balance_command, BalanceArgs};
pub use config::{handle_config_command, ConfigCommands};
pub use entry::{handle_entry_command, EntryCommands};
pub use export::{handle_export_command, ExportArgs};
pub use group::{handle_group_command, GroupCommands};
pub use member::{handle_member_command, MemberCommands};
pub use settle::{handle_settle_command, SettleCommands};

use chrono::{Local, NaiveDate};

use crate::config::settings::Settings;
use crate::engine::{SettlementStrategy, StrategyKind};
use crate::error::{TallyError, TallyResult};
use crate::models::{Group, Money};
use crate::services::GroupService;
use crate::storage::Storage;

/// Parse a user-entered amount such as "12.50" or "$12.50"
pub(crate) fn parse_amount(input: &str) -> TallyResult<Money> {
    Money::parse(input).map_err(|e| {
        TallyError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '12.50'. Error: {}",
            input, e
        ))
    })
}

/// Parse a YYYY-MM-DD date, defaulting to today
pub(crate) fn parse_date(input: Option<&str>) -> TallyResult<NaiveDate> {
    match input {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            TallyError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD.", s))
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Look up a group by name or ID
pub(crate) fn resolve_group(storage: &Storage, identifier: &str) -> TallyResult<Group> {
    GroupService::new(storage).resolve(identifier)
}

/// The strategy named on the command line, else the configured one
pub(crate) fn select_strategy(
    settings: &Settings,
    requested: Option<&str>,
) -> TallyResult<Box<dyn SettlementStrategy>> {
    let kind = match requested {
        Some(name) => StrategyKind::parse(name).ok_or_else(|| {
            TallyError::Validation(format!(
                "Invalid strategy: '{}'. Valid strategies: greedy, exact",
                name
            ))
        })?,
        None => settings.settlement_strategy,
    };
    Ok(kind.build(settings.settlement_tolerance()))
}
