//! Storage layer for Tally
//!
//! Provides the [`LedgerStore`] boundary and two implementations: the JSON
//! file store used by the CLI and an in-memory store for tests and embedding.

pub mod entries;
pub mod file_io;
pub mod groups;
pub mod memory;
pub mod participants;
pub mod settlements;
pub mod traits;

pub use entries::EntryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use groups::GroupRepository;
pub use memory::MemoryStore;
pub use participants::ParticipantRepository;
pub use settlements::SettlementRepository;
pub use traits::LedgerStore;

use std::sync::PoisonError;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::TallyPaths;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    EntryId, Group, GroupId, LedgerEntry, Participant, ParticipantId, Settlement, SettlementId,
};

pub(crate) fn lock_error<T>(err: PoisonError<T>) -> TallyError {
    TallyError::Persistence(format!("Storage lock poisoned: {}", err))
}

/// JSON file store: one repository per file plus the audit log
pub struct Storage {
    paths: TallyPaths,
    pub groups: GroupRepository,
    pub participants: ParticipantRepository,
    pub entries: EntryRepository,
    pub settlements: SettlementRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance (call `load_all` before reading)
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            groups: GroupRepository::new(paths.groups_file()),
            participants: ParticipantRepository::new(paths.participants_file()),
            entries: EntryRepository::new(paths.entries_file()),
            settlements: SettlementRepository::new(paths.settlements_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create and load in one step
    pub fn open(paths: TallyPaths) -> Result<Self, TallyError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    pub fn audit_logger(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), TallyError> {
        self.groups.load()?;
        self.participants.load()?;
        self.entries.load()?;
        self.settlements.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TallyError> {
        self.groups.save()?;
        self.participants.save()?;
        self.entries.save()?;
        self.settlements.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

impl LedgerStore for Storage {
    fn get_group(&self, id: GroupId) -> TallyResult<Option<Group>> {
        self.groups.get(id)
    }

    fn group_by_name(&self, name: &str) -> TallyResult<Option<Group>> {
        self.groups.get_by_name(name)
    }

    fn list_groups(&self) -> TallyResult<Vec<Group>> {
        self.groups.get_all()
    }

    fn persist_group(&self, group: Group) -> TallyResult<Group> {
        self.groups.upsert(group.clone())?;
        self.groups.save()?;
        Ok(group)
    }

    fn get_participant(&self, id: ParticipantId) -> TallyResult<Option<Participant>> {
        self.participants.get(id)
    }

    fn participants_in(&self, group_id: GroupId) -> TallyResult<Vec<Participant>> {
        self.participants.get_by_group(group_id)
    }

    fn persist_participant(&self, participant: Participant) -> TallyResult<Participant> {
        self.participants.upsert(participant.clone())?;
        self.participants.save()?;
        Ok(participant)
    }

    fn get_entry(&self, id: EntryId) -> TallyResult<Option<LedgerEntry>> {
        self.entries.get(id)
    }

    fn fetch_entries(&self, group_id: GroupId) -> TallyResult<Vec<LedgerEntry>> {
        self.entries.get_by_group(group_id)
    }

    fn persist_entry(&self, entry: LedgerEntry) -> TallyResult<LedgerEntry> {
        self.entries.upsert(entry.clone())?;
        self.entries.save()?;
        Ok(entry)
    }

    fn delete_entry(&self, id: EntryId) -> TallyResult<LedgerEntry> {
        let removed = self
            .entries
            .delete(id)?
            .ok_or_else(|| TallyError::entry_not_found(id.to_string()))?;
        self.entries.save()?;
        Ok(removed)
    }

    fn get_settlement(&self, id: SettlementId) -> TallyResult<Option<Settlement>> {
        self.settlements.get(id)
    }

    fn fetch_settlements(&self, group_id: GroupId) -> TallyResult<Vec<Settlement>> {
        self.settlements.get_by_group(group_id)
    }

    fn persist_settlement(&self, settlement: Settlement) -> TallyResult<Settlement> {
        self.settlements.upsert(settlement.clone())?;
        self.settlements.save()?;
        Ok(settlement)
    }

    fn delete_settlement(&self, id: SettlementId) -> TallyResult<Settlement> {
        let removed = self
            .settlements
            .delete(id)?
            .ok_or_else(|| TallyError::settlement_not_found(id.to_string()))?;
        self.settlements.save()?;
        Ok(removed)
    }

    fn audit(&self, entry: &AuditEntry) -> TallyResult<()> {
        self.audit.log(entry)
    }
}
