//! Balance service
//!
//! Loads a group's ledger from storage and hands it to the engine. Nothing
//! computed here is written back.

use serde::Serialize;

use crate::engine::{
    compute_balances, summarize_participants, Balances, ParticipantSummary, SettlementStrategy,
    SuggestedTransfer,
};
use crate::error::TallyResult;
use crate::models::{GroupId, LedgerEntry, Roster, Settlement};
use crate::storage::LedgerStore;

/// Everything recorded for one group at a point in time
#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub roster: Roster,
    pub entries: Vec<LedgerEntry>,
    pub settlements: Vec<Settlement>,
}

impl GroupSnapshot {
    /// Net balance per participant, in roster order
    pub fn balances(&self) -> TallyResult<Balances> {
        compute_balances(
            &self.entries,
            &self.settlements,
            &self.roster.participant_ids(),
        )
    }

    /// Paid / owed breakdown per participant, in roster order
    pub fn summaries(&self) -> TallyResult<Vec<ParticipantSummary>> {
        summarize_participants(
            &self.entries,
            &self.settlements,
            &self.roster.participant_ids(),
        )
    }
}

/// Service for balance queries
pub struct BalanceService<'a, S: LedgerStore> {
    storage: &'a S,
}

impl<'a, S: LedgerStore> BalanceService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    pub fn snapshot(&self, group_id: GroupId) -> TallyResult<GroupSnapshot> {
        Ok(GroupSnapshot {
            roster: self.storage.fetch_group(group_id)?,
            entries: self.storage.fetch_entries(group_id)?,
            settlements: self.storage.fetch_settlements(group_id)?,
        })
    }

    pub fn balances(&self, group_id: GroupId) -> TallyResult<Balances> {
        self.snapshot(group_id)?.balances()
    }

    pub fn summaries(&self, group_id: GroupId) -> TallyResult<Vec<ParticipantSummary>> {
        self.snapshot(group_id)?.summaries()
    }

    /// Current balances and the transfers `strategy` suggests for them
    pub fn suggest(
        &self,
        group_id: GroupId,
        strategy: &dyn SettlementStrategy,
    ) -> TallyResult<(Balances, Vec<SuggestedTransfer>)> {
        let balances = self.balances(group_id)?;
        let transfers = strategy.suggest(&balances)?;
        Ok((balances, transfers))
    }
}
