//! Settlement model
//!
//! A settlement records a real-world payment between two participants made to
//! pay down what one owes the other. Settlements are only ever created by an
//! explicit user action; suggestions from the engine are never persisted on
//! their own.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ParticipantId, SettlementId};
use super::money::Money;

/// A recorded payment from one participant to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,

    /// The group the payment settles debts in
    pub group_id: GroupId,

    /// Who paid
    pub from_id: ParticipantId,

    /// Who received the payment
    pub to_id: ParticipantId,

    /// Amount paid, always positive
    pub amount: Money,

    /// When the payment was made
    pub date: NaiveDate,

    /// Optional note (e.g., "bank transfer")
    #[serde(default)]
    pub note: String,

    /// When the settlement was recorded
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// Create a new settlement
    pub fn new(
        group_id: GroupId,
        from_id: ParticipantId,
        to_id: ParticipantId,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: SettlementId::new(),
            group_id,
            from_id,
            to_id,
            amount,
            date,
            note: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Validate the settlement's own shape (membership is checked by callers)
    pub fn validate(&self) -> Result<(), SettlementValidationError> {
        if !self.amount.is_positive() {
            return Err(SettlementValidationError::NonPositiveAmount(self.amount));
        }
        if self.from_id == self.to_id {
            return Err(SettlementValidationError::SameParticipant);
        }
        Ok(())
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.date.format("%Y-%m-%d"),
            self.from_id,
            self.to_id,
            self.amount
        )
    }
}

/// Validation errors for settlements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementValidationError {
    NonPositiveAmount(Money),
    SameParticipant,
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Settlement amount must be positive, got {}", amount)
            }
            Self::SameParticipant => {
                write!(f, "Settlement must be between two different participants")
            }
        }
    }
}

impl std::error::Error for SettlementValidationError {}
