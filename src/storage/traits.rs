//! Persistence boundary
//!
//! Services talk to storage only through [`LedgerStore`]: plain reads and
//! writes keyed by identifiers. Failures are reported as
//! `TallyError::Persistence` and passed straight through to the caller.

use serde::Serialize;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{TallyError, TallyResult};
use crate::models::{
    EntryId, Group, GroupId, LedgerEntry, Participant, ParticipantId, Roster, Settlement,
    SettlementId,
};

/// Read/write boundary for groups, participants, entries and settlements
pub trait LedgerStore {
    fn get_group(&self, id: GroupId) -> TallyResult<Option<Group>>;

    /// Case-insensitive name lookup
    fn group_by_name(&self, name: &str) -> TallyResult<Option<Group>>;

    fn list_groups(&self) -> TallyResult<Vec<Group>>;

    fn persist_group(&self, group: Group) -> TallyResult<Group>;

    fn get_participant(&self, id: ParticipantId) -> TallyResult<Option<Participant>>;

    /// Participants of a group in roster order (the order they joined)
    fn participants_in(&self, group_id: GroupId) -> TallyResult<Vec<Participant>>;

    fn persist_participant(&self, participant: Participant) -> TallyResult<Participant>;

    fn get_entry(&self, id: EntryId) -> TallyResult<Option<LedgerEntry>>;

    /// Entries of a group ordered by (date, created_at)
    fn fetch_entries(&self, group_id: GroupId) -> TallyResult<Vec<LedgerEntry>>;

    /// Create or update an entry
    fn persist_entry(&self, entry: LedgerEntry) -> TallyResult<LedgerEntry>;

    /// Remove an entry; `NotFound` if it does not exist
    fn delete_entry(&self, id: EntryId) -> TallyResult<LedgerEntry>;

    fn get_settlement(&self, id: SettlementId) -> TallyResult<Option<Settlement>>;

    /// Settlements of a group ordered by (date, created_at)
    fn fetch_settlements(&self, group_id: GroupId) -> TallyResult<Vec<Settlement>>;

    /// Create or update a settlement
    fn persist_settlement(&self, settlement: Settlement) -> TallyResult<Settlement>;

    /// Remove a settlement; `NotFound` if it does not exist
    fn delete_settlement(&self, id: SettlementId) -> TallyResult<Settlement>;

    /// Record an audit entry. Stores without an audit trail ignore it.
    fn audit(&self, _entry: &AuditEntry) -> TallyResult<()> {
        Ok(())
    }

    /// A group together with its participants; `NotFound` if absent
    fn fetch_group(&self, group_id: GroupId) -> TallyResult<Roster> {
        let group = self
            .get_group(group_id)?
            .ok_or_else(|| TallyError::group_not_found(group_id.to_string()))?;
        let participants = self.participants_in(group_id)?;
        Ok(Roster::new(group, participants))
    }

    fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> TallyResult<()>
    where
        Self: Sized,
    {
        self.audit(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> TallyResult<()>
    where
        Self: Sized,
    {
        self.audit(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        ))
    }

    fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> TallyResult<()>
    where
        Self: Sized,
    {
        self.audit(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
