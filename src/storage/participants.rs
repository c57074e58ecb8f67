//! Participant repository for JSON storage
//!
//! Manages loading and saving participants to participants.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{GroupId, Participant, ParticipantId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ParticipantData {
    participants: Vec<Participant>,
}

/// Repository for participant persistence with a per-group index
pub struct ParticipantRepository {
    path: PathBuf,
    data: RwLock<HashMap<ParticipantId, Participant>>,
    /// Index: group_id -> participant_ids
    by_group: RwLock<HashMap<GroupId, Vec<ParticipantId>>>,
}

impl ParticipantRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_group: RwLock::new(HashMap::new()),
        }
    }

    /// Load participants from disk and build the group index
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: ParticipantData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        data.clear();
        by_group.clear();

        for participant in file_data.participants {
            by_group
                .entry(participant.group_id)
                .or_default()
                .push(participant.id);
            data.insert(participant.id, participant);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut participants: Vec<_> = data.values().cloned().collect();
        participants.sort_by(|a, b| {
            a.group_id
                .cmp(&b.group_id)
                .then(a.created_at.cmp(&b.created_at))
        });

        write_json_atomic(&self.path, &ParticipantData { participants })
    }

    pub fn get(&self, id: ParticipantId) -> Result<Option<Participant>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Participants of a group in the order they joined
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Participant>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_group = self.by_group.read().map_err(lock_error)?;

        let ids = by_group.get(&group_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut participants: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        participants.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.name.cmp(&b.name))
        });
        Ok(participants)
    }

    /// Insert or update a participant
    pub fn upsert(&self, participant: Participant) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_group = self.by_group.write().map_err(lock_error)?;

        if let Some(old) = data.get(&participant.id) {
            if let Some(ids) = by_group.get_mut(&old.group_id) {
                ids.retain(|id| *id != participant.id);
            }
        }
        by_group
            .entry(participant.group_id)
            .or_default()
            .push(participant.id);

        data.insert(participant.id, participant);
        Ok(())
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
