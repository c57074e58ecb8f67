//! User preferences stored in `config.json`
//!
//! Every field has a default, so an old or hand-edited file with missing keys
//! still loads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::paths::TallyPaths;
use crate::engine::StrategyKind;
use crate::error::{TallyError, TallyResult};
use crate::models::{Money, SplitPolicy};
use crate::storage::write_json_atomic;

const SETTINGS_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub schema_version: u32,

    pub currency_symbol: String,

    /// Algorithm used for `settle suggest` and `settle apply`
    pub settlement_strategy: StrategyKind,

    /// Policy for `entry add` when `--policy` is omitted
    pub default_split_policy: SplitPolicy,

    /// Whose point of view `balance` highlights; display only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acting_participant: Option<String>,

    /// Balances within this many cents of zero count as settled
    pub settlement_tolerance_cents: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_VERSION,
            currency_symbol: "$".to_string(),
            settlement_strategy: StrategyKind::default(),
            default_split_policy: SplitPolicy::default(),
            acting_participant: None,
            settlement_tolerance_cents: 0,
        }
    }
}

impl Settings {
    /// Read `config.json`, or start from defaults when it doesn't exist yet
    ///
    /// Defaults are not written back; `tally init` and `tally config set` do that.
    pub fn load_or_create(paths: &TallyPaths) -> TallyResult<Self> {
        let path = paths.settings_file();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(TallyError::Io(format!("Failed to read settings: {}", e))),
        };

        let settings: Settings = serde_json::from_str(&text)
            .map_err(|e| TallyError::Config(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, paths: &TallyPaths) -> TallyResult<()> {
        self.validate()?;
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    fn validate(&self) -> TallyResult<()> {
        if self.settlement_tolerance_cents < 0 {
            return Err(TallyError::Config(
                "settlement_tolerance_cents cannot be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn settlement_tolerance(&self) -> Money {
        Money::from_cents(self.settlement_tolerance_cents)
    }

    /// Format an amount with the configured currency symbol
    pub fn format_money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}
