//! Group service
//!
//! Provides business logic for group management: creation, lookup by name or
//! ID, and edits.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{Group, GroupId, Roster};
use crate::storage::LedgerStore;

/// Service for group management
pub struct GroupService<'a, S: LedgerStore> {
    storage: &'a S,
}

impl<'a, S: LedgerStore> GroupService<'a, S> {
    /// Create a new group service
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Create a new group
    pub fn create(&self, name: &str, description: Option<&str>) -> TallyResult<Group> {
        let name = name.trim();
        if self.storage.group_by_name(name)?.is_some() {
            return Err(TallyError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        let mut group = Group::new(name);
        group.set_description(description.map(|d| d.trim().to_string()));
        group.validate()?;

        let group = self.storage.persist_group(group)?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;
        info!(group = %group.id, name = %group.name, "created group");

        Ok(group)
    }

    pub fn get(&self, id: GroupId) -> TallyResult<Option<Group>> {
        self.storage.get_group(id)
    }

    /// Find a group by name, full ID or short ID
    pub fn find(&self, identifier: &str) -> TallyResult<Option<Group>> {
        if let Some(group) = self.storage.group_by_name(identifier)? {
            return Ok(Some(group));
        }

        Ok(self
            .storage
            .list_groups()?
            .into_iter()
            .find(|g| g.id.matches(identifier)))
    }

    /// Like `find`, but a missing group is an error
    pub fn resolve(&self, identifier: &str) -> TallyResult<Group> {
        self.find(identifier)?
            .ok_or_else(|| TallyError::group_not_found(identifier))
    }

    /// All groups sorted by name
    pub fn list(&self) -> TallyResult<Vec<Group>> {
        self.storage.list_groups()
    }

    /// The group together with its participants
    pub fn roster(&self, id: GroupId) -> TallyResult<Roster> {
        self.storage.fetch_group(id)
    }

    /// Rename a group and/or change its description
    ///
    /// An empty description clears it.
    pub fn update(
        &self,
        id: GroupId,
        name: Option<&str>,
        description: Option<&str>,
    ) -> TallyResult<Group> {
        let mut group = self
            .storage
            .get_group(id)?
            .ok_or_else(|| TallyError::group_not_found(id.to_string()))?;
        let before = group.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if let Some(existing) = self.storage.group_by_name(new_name)? {
                if existing.id != id {
                    return Err(TallyError::Duplicate {
                        entity_type: "Group",
                        identifier: new_name.to_string(),
                    });
                }
            }
            group.rename(new_name);
        }

        if let Some(description) = description {
            group.set_description(Some(description.trim().to_string()));
        }

        group.validate()?;

        let mut changes = Vec::new();
        if before.name != group.name {
            changes.push(format!("name: '{}' -> '{}'", before.name, group.name));
        }
        if before.description != group.description {
            changes.push("description changed".to_string());
        }
        if changes.is_empty() {
            return Ok(before);
        }

        let group = self.storage.persist_group(group)?;

        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            Some(changes.join(", ")),
        )?;

        Ok(group)
    }
}
