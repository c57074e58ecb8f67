//! Settlement service
//!
//! Records real-world payments between participants. Suggestions from the
//! engine only become settlements through `record` or `record_suggestions`.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::audit::EntityType;
use crate::engine::SuggestedTransfer;
use crate::error::{TallyError, TallyResult};
use crate::models::{GroupId, Money, ParticipantId, Roster, Settlement, SettlementId};
use crate::storage::LedgerStore;

/// Service for settlements
pub struct SettlementService<'a, S: LedgerStore> {
    storage: &'a S,
}

impl<'a, S: LedgerStore> SettlementService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Record that `from_id` paid `to_id`
    pub fn record(
        &self,
        group_id: GroupId,
        from_id: ParticipantId,
        to_id: ParticipantId,
        amount: Money,
        date: NaiveDate,
        note: &str,
    ) -> TallyResult<Settlement> {
        let roster = self.storage.fetch_group(group_id)?;
        let settlement =
            Settlement::new(group_id, from_id, to_id, amount, date).with_note(note.trim());
        self.persist(&roster, settlement)
    }

    /// Record every suggested transfer as a settlement dated `date`
    ///
    /// All transfers are checked before the first one is written. If a write
    /// fails part way, the settlements already written are deleted again.
    pub fn record_suggestions(
        &self,
        group_id: GroupId,
        transfers: &[SuggestedTransfer],
        date: NaiveDate,
    ) -> TallyResult<Vec<Settlement>> {
        let roster = self.storage.fetch_group(group_id)?;

        let settlements: Vec<_> = transfers
            .iter()
            .map(|t| {
                Settlement::new(group_id, t.from, t.to, t.amount, date)
                    .with_note("suggested settlement")
            })
            .collect();
        for settlement in &settlements {
            check(&roster, settlement)?;
        }

        let mut recorded = Vec::with_capacity(settlements.len());
        for settlement in settlements {
            let written = self.storage.persist_settlement(settlement).and_then(|s| {
                recorded.push(s.clone());
                self.log_recorded(&roster, &s)
            });
            if let Err(err) = written {
                self.roll_back(&roster, &recorded);
                return Err(err);
            }
        }
        Ok(recorded)
    }

    pub fn get(&self, id: SettlementId) -> TallyResult<Option<Settlement>> {
        self.storage.get_settlement(id)
    }

    /// Settlements of a group ordered by date
    pub fn list(&self, group_id: GroupId) -> TallyResult<Vec<Settlement>> {
        self.storage.fetch_settlements(group_id)
    }

    fn persist(&self, roster: &Roster, settlement: Settlement) -> TallyResult<Settlement> {
        check(roster, &settlement)?;

        let settlement = self.storage.persist_settlement(settlement)?;
        self.log_recorded(roster, &settlement)?;
        Ok(settlement)
    }

    fn log_recorded(&self, roster: &Roster, settlement: &Settlement) -> TallyResult<()> {
        self.storage.log_create(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(describe(roster, settlement)),
            settlement,
        )?;
        info!(
            group = %settlement.group_id,
            settlement = %settlement.id,
            amount = %settlement.amount,
            "recorded settlement"
        );
        Ok(())
    }

    /// Best effort: a failed delete is logged and the rest still run
    fn roll_back(&self, roster: &Roster, recorded: &[Settlement]) {
        for settlement in recorded.iter().rev() {
            let removed = self.storage.delete_settlement(settlement.id).and_then(|s| {
                self.storage.log_delete(
                    EntityType::Settlement,
                    s.id.to_string(),
                    Some(describe(roster, &s)),
                    &s,
                )
            });
            match removed {
                Ok(()) => info!(settlement = %settlement.id, "rolled back settlement"),
                Err(err) => warn!(
                    settlement = %settlement.id,
                    error = %err,
                    "could not roll back settlement"
                ),
            }
        }
    }
}

fn describe(roster: &Roster, settlement: &Settlement) -> String {
    format!(
        "{} -> {} {}",
        roster.name_of(settlement.from_id),
        roster.name_of(settlement.to_id),
        settlement.amount
    )
}

fn check(roster: &Roster, settlement: &Settlement) -> TallyResult<()> {
    settlement.validate()?;
    for id in [settlement.from_id, settlement.to_id] {
        if !roster.contains(id) {
            return Err(TallyError::participant_reference(id.to_string()));
        }
    }
    Ok(())
}
