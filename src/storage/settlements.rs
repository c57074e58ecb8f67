//! Settlement repository for JSON storage
//!
//! Manages loading and saving recorded settlements to settlements.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{GroupId, Settlement, SettlementId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<Settlement>,
}

/// Repository for settlements with a per-group index
pub struct SettlementRepository {
    path: PathBuf,
    data: RwLock<HashMap<SettlementId, Settlement>>,
    /// Index: group_id -> settlement_ids
    by_group: RwLock<HashMap<GroupId, Vec<SettlementId>>>,
}

impl SettlementRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_group: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: SettlementData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        data.clear();
        by_group.clear();

        for settlement in file_data.settlements {
            by_group
                .entry(settlement.group_id)
                .or_default()
                .push(settlement.id);
            data.insert(settlement.id, settlement);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut settlements: Vec<_> = data.values().cloned().collect();
        settlements.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));

        write_json_atomic(&self.path, &SettlementData { settlements })
    }

    pub fn get(&self, id: SettlementId) -> Result<Option<Settlement>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Settlements of a group ordered by (date, created_at)
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Settlement>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_group = self.by_group.read().map_err(lock_error)?;

        let ids = by_group.get(&group_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut settlements: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        settlements.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
        Ok(settlements)
    }

    /// Insert or update a settlement
    pub fn upsert(&self, settlement: Settlement) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        if !data.contains_key(&settlement.id) {
            by_group
                .entry(settlement.group_id)
                .or_default()
                .push(settlement.id);
        }

        data.insert(settlement.id, settlement);
        Ok(())
    }

    pub fn delete(&self, id: SettlementId) -> Result<Option<Settlement>, TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        let removed = data.remove(&id);
        if let Some(settlement) = &removed {
            if let Some(ids) = by_group.get_mut(&settlement.group_id) {
                ids.retain(|s| *s != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
