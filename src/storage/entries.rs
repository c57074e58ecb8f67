//! Ledger entry repository for JSON storage
//!
//! Manages loading and saving entries (with their embedded splits) to
//! entries.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{EntryId, GroupId, LedgerEntry};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct EntryData {
    entries: Vec<LedgerEntry>,
}

/// Repository for ledger entries with a per-group index
pub struct EntryRepository {
    path: PathBuf,
    data: RwLock<HashMap<EntryId, LedgerEntry>>,
    /// Index: group_id -> entry_ids
    by_group: RwLock<HashMap<GroupId, Vec<EntryId>>>,
}

fn chronological(a: &LedgerEntry, b: &LedgerEntry) -> std::cmp::Ordering {
    a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at))
}

impl EntryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_group: RwLock::new(HashMap::new()),
        }
    }

    /// Load entries from disk and build the group index
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: EntryData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        data.clear();
        by_group.clear();

        for entry in file_data.entries {
            by_group.entry(entry.group_id).or_default().push(entry.id);
            data.insert(entry.id, entry);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut entries: Vec<_> = data.values().cloned().collect();
        entries.sort_by(chronological);

        write_json_atomic(&self.path, &EntryData { entries })
    }

    pub fn get(&self, id: EntryId) -> Result<Option<LedgerEntry>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Entries of a group ordered by (date, created_at)
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<LedgerEntry>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_group = self.by_group.read().map_err(lock_error)?;

        let ids = by_group.get(&group_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut entries: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        entries.sort_by(chronological);
        Ok(entries)
    }

    /// Insert or update an entry
    pub fn upsert(&self, entry: LedgerEntry) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        if let Some(old) = data.get(&entry.id) {
            if let Some(ids) = by_group.get_mut(&old.group_id) {
                ids.retain(|id| *id != entry.id);
            }
        }
        by_group.entry(entry.group_id).or_default().push(entry.id);

        data.insert(entry.id, entry);
        Ok(())
    }

    /// Remove an entry, returning it if it existed
    pub fn delete(&self, id: EntryId) -> Result<Option<LedgerEntry>, TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(entry) = &removed {
            if let Some(ids) = by_group.get_mut(&entry.group_id) {
                ids.retain(|e| *e != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryDraft, Money, ParticipantId, Split, SplitPolicy, SplitRequest};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, EntryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = EntryRepository::new(temp_dir.path().join("entries.json"));
        (temp_dir, repo)
    }

    fn entry_on(group: GroupId, day: u32) -> LedgerEntry {
        let payer = ParticipantId::new();
        let request = SplitRequest::equal(payer);
        let draft = EntryDraft::new(
            group,
            payer,
            Money::from_cents(1000),
            SplitPolicy::Equal,
            vec![request.clone()],
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        );
        LedgerEntry::from_draft(&draft, vec![Split::from_request(&request, draft.amount)])
    }

    #[test]
    fn test_group_entries_are_chronological() {
        let (_temp_dir, repo) = create_test_repo();
        let group = GroupId::new();
        repo.upsert(entry_on(group, 20)).unwrap();
        repo.upsert(entry_on(group, 5)).unwrap();
        repo.upsert(entry_on(GroupId::new(), 1)).unwrap();

        let days: Vec<_> = repo
            .get_by_group(group)
            .unwrap()
            .iter()
            .map(|e| e.date.format("%d").to_string())
            .collect();
        assert_eq!(days, vec!["05", "20"]);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let group = GroupId::new();
        let entry = entry_on(group, 3);
        let id = entry.id;
        repo.upsert(entry).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert!(repo.get_by_group(group).unwrap().is_empty());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload_keeps_splits() {
        let (temp_dir, repo) = create_test_repo();
        let entry = entry_on(GroupId::new(), 9);
        let id = entry.id;
        repo.upsert(entry).unwrap();
        repo.save().unwrap();

        let reloaded = EntryRepository::new(temp_dir.path().join("entries.json"));
        reloaded.load().unwrap();
        let back = reloaded.get(id).unwrap().unwrap();
        assert_eq!(back.splits.len(), 1);
        assert_eq!(back.splits_total(), Money::from_cents(1000));
    }
}
