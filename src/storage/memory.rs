//! In-memory ledger store
//!
//! Keeps everything in process memory. Used by service tests and by callers
//! that embed the engine without a data directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use crate::audit::AuditEntry;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    EntryId, Group, GroupId, LedgerEntry, Participant, ParticipantId, Settlement, SettlementId,
};

use super::lock_error;
use super::traits::LedgerStore;

#[derive(Default)]
struct MemoryState {
    groups: HashMap<GroupId, Group>,
    /// Insertion order is roster order
    participants: Vec<Participant>,
    entries: HashMap<EntryId, LedgerEntry>,
    settlements: HashMap<SettlementId, Settlement>,
    audit: Vec<AuditEntry>,
}

/// [`LedgerStore`] backed by in-process maps
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
    read_only: AtomicBool,
    /// Settlement writes left before they start failing; `None` is unlimited
    settlement_writes_left: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a persistence error
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Let `count` more settlement writes succeed, then fail the rest
    pub fn fail_settlement_writes_after(&self, count: usize) -> TallyResult<()> {
        *self.settlement_writes_left.lock().map_err(lock_error)? = Some(count);
        Ok(())
    }

    /// Audit entries recorded so far, oldest first
    pub fn audit_entries(&self) -> TallyResult<Vec<AuditEntry>> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state.audit.clone())
    }

    fn check_writable(&self) -> TallyResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(TallyError::Persistence("store is read-only".into()));
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    fn get_group(&self, id: GroupId) -> TallyResult<Option<Group>> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state.groups.get(&id).cloned())
    }

    fn group_by_name(&self, name: &str) -> TallyResult<Option<Group>> {
        let state = self.inner.read().map_err(lock_error)?;
        let name = name.trim();
        Ok(state
            .groups
            .values()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn list_groups(&self) -> TallyResult<Vec<Group>> {
        let state = self.inner.read().map_err(lock_error)?;
        let mut groups: Vec<_> = state.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(groups)
    }

    fn persist_group(&self, group: Group) -> TallyResult<Group> {
        self.check_writable()?;
        let mut state = self.inner.write().map_err(lock_error)?;
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    fn get_participant(&self, id: ParticipantId) -> TallyResult<Option<Participant>> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state.participants.iter().find(|p| p.id == id).cloned())
    }

    fn participants_in(&self, group_id: GroupId) -> TallyResult<Vec<Participant>> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state
            .participants
            .iter()
            .filter(|p| p.group_id == group_id)
            .cloned()
            .collect())
    }

    fn persist_participant(&self, participant: Participant) -> TallyResult<Participant> {
        self.check_writable()?;
        let mut state = self.inner.write().map_err(lock_error)?;
        match state.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => *existing = participant.clone(),
            None => state.participants.push(participant.clone()),
        }
        Ok(participant)
    }

    fn get_entry(&self, id: EntryId) -> TallyResult<Option<LedgerEntry>> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state.entries.get(&id).cloned())
    }

    fn fetch_entries(&self, group_id: GroupId) -> TallyResult<Vec<LedgerEntry>> {
        let state = self.inner.read().map_err(lock_error)?;
        let mut entries: Vec<_> = state
            .entries
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(entries)
    }

    fn persist_entry(&self, entry: LedgerEntry) -> TallyResult<LedgerEntry> {
        self.check_writable()?;
        let mut state = self.inner.write().map_err(lock_error)?;
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn delete_entry(&self, id: EntryId) -> TallyResult<LedgerEntry> {
        self.check_writable()?;
        let mut state = self.inner.write().map_err(lock_error)?;
        state
            .entries
            .remove(&id)
            .ok_or_else(|| TallyError::entry_not_found(id.to_string()))
    }

    fn get_settlement(&self, id: SettlementId) -> TallyResult<Option<Settlement>> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state.settlements.get(&id).cloned())
    }

    fn fetch_settlements(&self, group_id: GroupId) -> TallyResult<Vec<Settlement>> {
        let state = self.inner.read().map_err(lock_error)?;
        let mut settlements: Vec<_> = state
            .settlements
            .values()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect();
        settlements.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(settlements)
    }

    fn persist_settlement(&self, settlement: Settlement) -> TallyResult<Settlement> {
        self.check_writable()?;
        let mut writes_left = self.settlement_writes_left.lock().map_err(lock_error)?;
        match writes_left.as_mut() {
            Some(0) => return Err(TallyError::Persistence("settlement write failed".into())),
            Some(left) => *left -= 1,
            None => {}
        }
        drop(writes_left);
        let mut state = self.inner.write().map_err(lock_error)?;
        state.settlements.insert(settlement.id, settlement.clone());
        Ok(settlement)
    }

    fn delete_settlement(&self, id: SettlementId) -> TallyResult<Settlement> {
        self.check_writable()?;
        let mut state = self.inner.write().map_err(lock_error)?;
        state
            .settlements
            .remove(&id)
            .ok_or_else(|| TallyError::settlement_not_found(id.to_string()))
    }

    fn audit(&self, entry: &AuditEntry) -> TallyResult<()> {
        let mut state = self.inner.write().map_err(lock_error)?;
        state.audit.push(entry.clone());
        Ok(())
    }
}
