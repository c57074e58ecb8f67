//! Whole-group JSON export
//!
//! Writes one group's complete ledger, with derived balances and settlement
//! suggestions, as a versioned JSON document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::engine::{ParticipantBalance, SettlementStrategy, SuggestedTransfer};
use crate::error::{TallyError, TallyResult};
use crate::models::{Group, LedgerEntry, Participant, Settlement};
use crate::services::GroupSnapshot;

/// Bumped when a field is renamed or removed
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A group's ledger plus everything derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// `tally` version that wrote the file
    pub app_version: String,

    pub group: Group,

    /// Members in roster order
    pub participants: Vec<Participant>,

    pub entries: Vec<LedgerEntry>,

    pub settlements: Vec<Settlement>,

    /// Net balance per participant at export time
    pub balances: Vec<ParticipantBalance>,

    /// Strategy the suggestions were computed with
    pub strategy: String,

    /// Transfers that would settle the group
    pub suggestions: Vec<SuggestedTransfer>,
}

impl GroupExport {
    /// Build an export from a snapshot, deriving balances and suggestions
    pub fn build(snapshot: &GroupSnapshot, strategy: &dyn SettlementStrategy) -> TallyResult<Self> {
        let balances = snapshot.balances()?;
        let suggestions = strategy.suggest(&balances)?;

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            group: snapshot.roster.group.clone(),
            participants: snapshot.roster.participants.clone(),
            entries: snapshot.entries.clone(),
            settlements: snapshot.settlements.clone(),
            balances: balances.iter().copied().collect(),
            strategy: strategy.name().to_string(),
            suggestions,
        })
    }
}

/// Write the export as JSON
pub fn export_group_json<W: Write>(
    export: &GroupExport,
    writer: &mut W,
    pretty: bool,
) -> TallyResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    }
    .map_err(|e| TallyError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}
