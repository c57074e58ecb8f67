//! Participant service
//!
//! Adds people to groups and renames them. Participants are never removed:
//! entries and settlements keep referring to them.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{GroupId, Participant, ParticipantId};
use crate::storage::LedgerStore;

/// Service for participant management
pub struct ParticipantService<'a, S: LedgerStore> {
    storage: &'a S,
}

impl<'a, S: LedgerStore> ParticipantService<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Add a participant to a group
    pub fn add(&self, group_id: GroupId, name: &str) -> TallyResult<Participant> {
        let roster = self.storage.fetch_group(group_id)?;
        let name = name.trim();

        if roster
            .participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name))
        {
            return Err(TallyError::Duplicate {
                entity_type: "Participant",
                identifier: name.to_string(),
            });
        }

        let participant = Participant::new(group_id, name);
        participant.validate()?;

        let participant = self.storage.persist_participant(participant)?;

        self.storage.log_create(
            EntityType::Participant,
            participant.id.to_string(),
            Some(participant.name.clone()),
            &participant,
        )?;
        info!(group = %group_id, participant = %participant.name, "added participant");

        Ok(participant)
    }

    pub fn get(&self, id: ParticipantId) -> TallyResult<Option<Participant>> {
        self.storage.get_participant(id)
    }

    /// Participants of a group in roster order
    pub fn list(&self, group_id: GroupId) -> TallyResult<Vec<Participant>> {
        self.storage.fetch_group(group_id).map(|r| r.participants)
    }

    /// Find a participant of the group by name or ID
    pub fn find(&self, group_id: GroupId, identifier: &str) -> TallyResult<Option<Participant>> {
        let roster = self.storage.fetch_group(group_id)?;
        Ok(roster.find(identifier).cloned())
    }

    /// Like `find`, but someone outside the group is a reference error
    pub fn resolve(&self, group_id: GroupId, identifier: &str) -> TallyResult<Participant> {
        self.find(group_id, identifier)?
            .ok_or_else(|| TallyError::participant_reference(identifier))
    }

    /// Give a participant a new display name
    pub fn rename(&self, id: ParticipantId, new_name: &str) -> TallyResult<Participant> {
        let mut participant = self
            .storage
            .get_participant(id)?
            .ok_or_else(|| TallyError::participant_not_found(id.to_string()))?;
        let before = participant.clone();
        let new_name = new_name.trim();

        let roster = self.storage.fetch_group(participant.group_id)?;
        if roster
            .participants
            .iter()
            .any(|p| p.id != id && p.name.eq_ignore_ascii_case(new_name))
        {
            return Err(TallyError::Duplicate {
                entity_type: "Participant",
                identifier: new_name.to_string(),
            });
        }

        participant.rename(new_name);
        participant.validate()?;

        let participant = self.storage.persist_participant(participant)?;

        self.storage.log_update(
            EntityType::Participant,
            participant.id.to_string(),
            Some(participant.name.clone()),
            &before,
            &participant,
            Some(format!("name: '{}' -> '{}'", before.name, participant.name)),
        )?;

        Ok(participant)
    }
}
