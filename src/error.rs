//! Error taxonomy for ledger operations
//!
//! Validation and split-mismatch errors are raised before anything is
//! persisted. Reference and not-found errors abort the operation. Store
//! failures surface unchanged as `Persistence`.

use thiserror::Error;

use crate::models::{
    EntryValidationError, GroupValidationError, Money, ParticipantValidationError,
    SettlementValidationError,
};

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed input: non-positive amounts, invalid weights, corrupt balances
    #[error("Validation error: {0}")]
    Validation(String),

    /// Exact-amount splits do not add up to the entry amount
    #[error("Split amounts ({actual}) do not match entry amount ({expected})")]
    SplitMismatch { expected: Money, actual: Money },

    /// A participant or group reference that does not resolve within the group
    #[error("{entity_type} is not part of this group: {identifier}")]
    Reference {
        entity_type: &'static str,
        identifier: String,
    },

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Group names and participant names within a group are unique
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Failure reported by the persistence collaborator
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Export error: {0}")]
    Export(String),
}

macro_rules! not_found_ctor {
    ($($fn_name:ident => $kind:literal),* $(,)?) => {
        $(
            pub fn $fn_name(identifier: impl Into<String>) -> Self {
                Self::NotFound {
                    entity_type: $kind,
                    identifier: identifier.into(),
                }
            }
        )*
    };
}

impl TallyError {
    not_found_ctor! {
        group_not_found => "Group",
        participant_not_found => "Participant",
        entry_not_found => "Entry",
        settlement_not_found => "Settlement",
    }

    /// A participant named in an entry or settlement that isn't a group member
    pub fn participant_reference(identifier: impl Into<String>) -> Self {
        Self::Reference {
            entity_type: "Participant",
            identifier: identifier.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference { .. })
    }

    pub fn is_split_mismatch(&self) -> bool {
        matches!(self, Self::SplitMismatch { .. })
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<EntryValidationError> for TallyError {
    fn from(err: EntryValidationError) -> Self {
        match err {
            EntryValidationError::UnknownParticipant(id) => {
                Self::participant_reference(id.to_string())
            }
            EntryValidationError::WrongGroup => Self::Reference {
                entity_type: "Group",
                identifier: "entry group does not match".into(),
            },
            other => Self::Validation(other.to_string()),
        }
    }
}

// Record-level validation failures that carry no reference information
macro_rules! validation_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for TallyError {
                fn from(err: $source) -> Self {
                    Self::Validation(err.to_string())
                }
            }
        )*
    };
}

validation_from!(
    SettlementValidationError,
    GroupValidationError,
    ParticipantValidationError
);

/// Result type alias for Tally operations
pub type TallyResult<T> = Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let err = TallyError::group_not_found("Ski Trip");
        assert_eq!(err.to_string(), "Group not found: Ski Trip");
        assert!(err.is_not_found() && !err.is_validation());

        let err = TallyError::settlement_not_found("stl-1a2b3c4d");
        assert_eq!(err.to_string(), "Settlement not found: stl-1a2b3c4d");
    }

    #[test]
    fn test_duplicate_message() {
        let err = TallyError::Duplicate {
            entity_type: "Participant",
            identifier: "Alice".into(),
        };
        assert_eq!(err.to_string(), "Participant already exists: Alice");
    }

    #[test]
    fn test_split_mismatch_error() {
        let err = TallyError::SplitMismatch {
            expected: Money::from_cents(5000),
            actual: Money::from_cents(5500),
        };
        assert_eq!(
            err.to_string(),
            "Split amounts ($55.00) do not match entry amount ($50.00)"
        );
        assert!(err.is_split_mismatch());
    }

    #[test]
    fn test_reference_error() {
        let err = TallyError::participant_reference("Mallory");
        assert_eq!(
            err.to_string(),
            "Participant is not part of this group: Mallory"
        );
        assert!(err.is_reference());
    }

    #[test]
    fn test_entry_validation_maps_to_taxonomy() {
        let reference: TallyError =
            EntryValidationError::UnknownParticipant(crate::models::ParticipantId::new()).into();
        assert!(reference.is_reference());

        let validation: TallyError =
            EntryValidationError::NonPositiveAmount(Money::zero()).into();
        assert!(validation.is_validation());
    }

    #[test]
    fn test_record_validation_maps_to_validation() {
        let err: TallyError = SettlementValidationError::SameParticipant.into();
        assert!(err.is_validation());
    }
}
