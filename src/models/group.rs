//! Group model
//!
//! A group is the unit of sharing: participants, entries and settlements all
//! belong to exactly one group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ParticipantId};
use super::participant::Participant;

/// A group of people sharing costs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Group name (e.g., "Ski Trip 2025")
    pub name: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// When the group was last modified
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new group with a description
    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut group = Self::new(name);
        group.description = Some(description.into());
        group
    }

    /// Rename the group
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Replace the description (None clears it)
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.trim().is_empty());
        self.updated_at = Utc::now();
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(GroupValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A group together with its participants, in input order
///
/// The participant order is the canonical order for every deterministic
/// tie-break in split allocation and settlement suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub group: Group,
    pub participants: Vec<Participant>,
}

impl Roster {
    pub fn new(group: Group, participants: Vec<Participant>) -> Self {
        Self {
            group,
            participants,
        }
    }

    /// Whether the participant belongs to this group
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.iter().any(|p| p.id == id)
    }

    /// Look up a participant by ID
    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Display name for a participant, falling back to the short ID
    pub fn name_of(&self, id: ParticipantId) -> String {
        self.participant(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Find a participant by name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> Option<&Participant> {
        let identifier = identifier.trim();
        self.participants
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(identifier))
            .or_else(|| self.participants.iter().find(|p| p.id.matches(identifier)))
    }

    /// Participant IDs in input order
    pub fn participant_ids(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id).collect()
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Group name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for GroupValidationError {}
