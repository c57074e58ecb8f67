//! Group repository for JSON storage
//!
//! Manages loading and saving groups to groups.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Group, GroupId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

/// Serializable group data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GroupData {
    groups: Vec<Group>,
}

/// Repository for group persistence
pub struct GroupRepository {
    path: PathBuf,
    data: RwLock<HashMap<GroupId, Group>>,
    /// Index: lowercased name -> group_id
    by_name: RwLock<HashMap<String, GroupId>>,
}

impl GroupRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_name: RwLock::new(HashMap::new()),
        }
    }

    /// Load groups from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: GroupData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_name = self.by_name.write().map_err(lock_error)?;

        data.clear();
        by_name.clear();

        for group in file_data.groups {
            by_name.insert(group.name.to_lowercase(), group.id);
            data.insert(group.id, group);
        }

        Ok(())
    }

    /// Save groups to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let groups = self.get_all()?;
        write_json_atomic(&self.path, &GroupData { groups })
    }

    pub fn get(&self, id: GroupId) -> Result<Option<Group>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All groups sorted by name
    pub fn get_all(&self) -> Result<Vec<Group>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut groups: Vec<_> = data.values().cloned().collect();
        groups.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(groups)
    }

    /// Get a group by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Group>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_name = self.by_name.read().map_err(lock_error)?;

        Ok(by_name
            .get(&name.trim().to_lowercase())
            .and_then(|id| data.get(id).cloned()))
    }

    /// Insert or update a group
    pub fn upsert(&self, group: Group) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_name = self.by_name.write().map_err(lock_error)?;

        if let Some(old) = data.get(&group.id) {
            by_name.remove(&old.name.to_lowercase());
        }
        by_name.insert(group.name.to_lowercase(), group.id);

        data.insert(group.id, group);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
