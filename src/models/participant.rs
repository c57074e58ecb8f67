//! Participant model
//!
//! A person taking part in a group's shared costs. Only the display name can
//! change after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ParticipantId};

/// A member of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Unique identifier
    pub id: ParticipantId,

    /// The group this participant belongs to
    pub group_id: GroupId,

    /// Display name, unique within the group (case-insensitive)
    pub name: String,

    /// When the participant was added
    pub created_at: DateTime<Utc>,

    /// When the participant was last renamed
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new participant in a group
    pub fn new(group_id: GroupId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ParticipantId::new(),
            group_id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Validate the participant
    pub fn validate(&self) -> Result<(), ParticipantValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ParticipantValidationError::EmptyName);
        }
        if name.len() > 50 {
            return Err(ParticipantValidationError::NameTooLong(name.len()));
        }
        // '=' separates names from values in split arguments
        if name.contains('=') {
            return Err(ParticipantValidationError::ReservedCharacter('='));
        }
        Ok(())
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for participants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantValidationError {
    EmptyName,
    NameTooLong(usize),
    ReservedCharacter(char),
}

impl fmt::Display for ParticipantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Participant name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Participant name too long ({} chars, max 50)", len)
            }
            Self::ReservedCharacter(c) => {
                write!(f, "Participant name cannot contain '{}'", c)
            }
        }
    }
}

impl std::error::Error for ParticipantValidationError {}
