//! Configuration CLI commands

use clap::Subcommand;

use crate::config::paths::TallyPaths;
use crate::config::settings::Settings;
use crate::engine::StrategyKind;
use crate::error::{TallyError, TallyResult};
use crate::models::SplitPolicy;

/// Config subcommands; without one, the current configuration is shown
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Change a setting
    ///
    /// Keys: currency, strategy, split-policy, acting, tolerance
    Set {
        /// Setting name
        key: String,
        /// New value ("" clears `acting`)
        value: String,
    },
}

/// Handle `tally config`
pub fn handle_config_command(
    paths: &TallyPaths,
    settings: &mut Settings,
    cmd: Option<ConfigCommands>,
) -> TallyResult<()> {
    match cmd {
        None => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:     {}", settings.currency_symbol);
            println!("  Settlement strategy: {}", settings.settlement_strategy);
            println!("  Default split:       {}", settings.default_split_policy);
            println!(
                "  Acting participant:  {}",
                settings.acting_participant.as_deref().unwrap_or("(none)")
            );
            println!(
                "  Settle tolerance:    {}",
                settings.format_money(settings.settlement_tolerance())
            );
        }

        Some(ConfigCommands::Set { key, value }) => {
            apply_setting(settings, &key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, value);
        }
    }

    Ok(())
}

fn apply_setting(settings: &mut Settings, key: &str, value: &str) -> TallyResult<()> {
    let value = value.trim();
    match key.trim().to_lowercase().as_str() {
        "currency" | "currency_symbol" => settings.currency_symbol = value.to_string(),
        "strategy" | "settlement_strategy" => {
            settings.settlement_strategy = StrategyKind::parse(value).ok_or_else(|| {
                TallyError::Config(format!(
                    "Invalid strategy: '{}'. Valid strategies: greedy, exact",
                    value
                ))
            })?;
        }
        "split-policy" | "default_split_policy" => {
            settings.default_split_policy = SplitPolicy::parse(value).ok_or_else(|| {
                TallyError::Config(format!(
                    "Invalid split policy: '{}'. Valid policies: equal, exact, weighted",
                    value
                ))
            })?;
        }
        "acting" | "acting_participant" => {
            settings.acting_participant = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
        "tolerance" | "settlement_tolerance_cents" => {
            let cents = value.parse::<i64>().ok().filter(|c| *c >= 0).ok_or_else(|| {
                TallyError::Config(format!(
                    "Invalid tolerance: '{}'. Use a whole number of cents, 0 or more",
                    value
                ))
            })?;
            settings.settlement_tolerance_cents = cents;
        }
        other => {
            return Err(TallyError::Config(format!(
                "Unknown setting: '{}'. Keys: currency, strategy, split-policy, acting, tolerance",
                other
            )))
        }
    }
    Ok(())
}
