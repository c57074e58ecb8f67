//! Ledger entry model
//!
//! Represents expenses, income and direct transfers recorded in a group,
//! together with the splits that divide each entry's amount between
//! participants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::group::Roster;
use super::ids::{EntryId, GroupId, ParticipantId, SplitId};
use super::money::Money;

/// What kind of money movement an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A shared cost paid by one participant
    #[default]
    Expense,
    /// Money handed directly from the payer to a single recipient
    Transfer,
    /// Money received by one participant on behalf of the group
    Income,
}

impl EntryKind {
    /// Parse an entry kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "exp" => Some(Self::Expense),
            "transfer" | "xfer" | "reimbursement" => Some(Self::Transfer),
            "income" | "inc" => Some(Self::Income),
            _ => None,
        }
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self, Self::Transfer)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Transfer => write!(f, "Transfer"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// How an entry's amount is divided between its split participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitPolicy {
    /// Everyone pays the same share
    #[default]
    Equal,
    /// Each participant's share is given explicitly
    ExactAmount,
    /// Shares are proportional to per-participant weights
    Weighted,
}

impl SplitPolicy {
    /// Parse a split policy from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equal" | "evenly" => Some(Self::Equal),
            "exact" | "exact-amount" | "exact_amount" | "amount" => Some(Self::ExactAmount),
            "weighted" | "weight" | "shares" => Some(Self::Weighted),
            _ => None,
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "Equal"),
            Self::ExactAmount => write!(f, "Exact amount"),
            Self::Weighted => write!(f, "Weighted"),
        }
    }
}

/// Raw per-participant input to the split calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRequest {
    pub participant_id: ParticipantId,

    /// Requested share (exact-amount policy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_amount: Option<Money>,

    /// Relative weight (weighted policy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl SplitRequest {
    /// A request for an equal share
    pub fn equal(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            custom_amount: None,
            weight: None,
        }
    }

    /// A request for an exact share
    pub fn exact(participant_id: ParticipantId, amount: Money) -> Self {
        Self {
            participant_id,
            custom_amount: Some(amount),
            weight: None,
        }
    }

    /// A request for a weighted share
    pub fn weighted(participant_id: ParticipantId, weight: f64) -> Self {
        Self {
            participant_id,
            custom_amount: None,
            weight: Some(weight),
        }
    }
}

/// One participant's computed share of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// Unique identifier
    pub id: SplitId,

    /// The participant who carries this share
    pub participant_id: ParticipantId,

    /// Resulting share; may be zero
    pub amount: Money,

    /// Raw exact-amount input, kept so the split can be recomputed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_amount: Option<Money>,

    /// Raw weight input, kept so the split can be recomputed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Split {
    /// Create a split carrying the raw input it was computed from
    pub fn from_request(request: &SplitRequest, amount: Money) -> Self {
        Self {
            id: SplitId::new(),
            participant_id: request.participant_id,
            amount,
            custom_amount: request.custom_amount,
            weight: request.weight,
        }
    }

    /// The raw input this split was computed from
    pub fn to_request(&self) -> SplitRequest {
        SplitRequest {
            participant_id: self.participant_id,
            custom_amount: self.custom_amount,
            weight: self.weight,
        }
    }
}

/// A recorded expense, transfer or income
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier
    pub id: EntryId,

    /// The group this entry belongs to
    pub group_id: GroupId,

    /// Who paid (or, for income, who received the money)
    pub payer_id: ParticipantId,

    /// Total amount, always positive
    pub amount: Money,

    pub kind: EntryKind,

    pub policy: SplitPolicy,

    /// Free-form description (e.g., "Groceries")
    #[serde(default)]
    pub description: String,

    /// When the expense happened
    pub date: NaiveDate,

    /// Computed shares, summing exactly to `amount`
    #[serde(default)]
    pub splits: Vec<Split>,

    /// When the entry was created
    pub created_at: DateTime<Utc>,

    /// When the entry was last modified
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Build an entry from a validated draft and its computed splits
    pub fn from_draft(draft: &EntryDraft, splits: Vec<Split>) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            group_id: draft.group_id,
            payer_id: draft.payer_id,
            amount: draft.amount,
            kind: draft.kind,
            policy: draft.policy,
            description: draft.description.clone(),
            date: draft.date,
            splits,
            created_at: now,
            updated_at: now,
        }
    }

    /// Get the total of all splits (equals `amount` for a consistent entry)
    pub fn splits_total(&self) -> Money {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// The recipient of a transfer
    pub fn recipient(&self) -> Option<ParticipantId> {
        if self.kind.is_transfer() {
            self.splits.first().map(|s| s.participant_id)
        } else {
            None
        }
    }

    /// The share carried by a participant (zero when not part of the split)
    pub fn share_of(&self, participant_id: ParticipantId) -> Money {
        self.splits
            .iter()
            .filter(|s| s.participant_id == participant_id)
            .map(|s| s.amount)
            .sum()
    }

    /// Raw split inputs, in stored order
    pub fn split_requests(&self) -> Vec<SplitRequest> {
        self.splits.iter().map(Split::to_request).collect()
    }

    /// Rebuild a draft carrying this entry's current values
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            group_id: self.group_id,
            payer_id: self.payer_id,
            amount: self.amount,
            kind: self.kind,
            policy: self.policy,
            description: self.description.clone(),
            date: self.date,
            shares: self.split_requests(),
        }
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.description,
            self.amount
        )
    }
}

/// An incoming entry that has not been split or persisted yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub group_id: GroupId,
    pub payer_id: ParticipantId,
    pub amount: Money,
    pub kind: EntryKind,
    pub policy: SplitPolicy,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    /// Split participants in input order
    pub shares: Vec<SplitRequest>,
}

impl EntryDraft {
    /// Draft an expense (or income, via `kind`)
    pub fn new(
        group_id: GroupId,
        payer_id: ParticipantId,
        amount: Money,
        policy: SplitPolicy,
        shares: Vec<SplitRequest>,
        date: NaiveDate,
    ) -> Self {
        Self {
            group_id,
            payer_id,
            amount,
            kind: EntryKind::Expense,
            policy,
            description: String::new(),
            date,
            shares,
        }
    }

    /// Draft a direct transfer of the full amount from payer to recipient
    pub fn transfer(
        group_id: GroupId,
        payer_id: ParticipantId,
        recipient_id: ParticipantId,
        amount: Money,
        date: NaiveDate,
    ) -> Self {
        Self {
            group_id,
            payer_id,
            amount,
            kind: EntryKind::Transfer,
            policy: SplitPolicy::ExactAmount,
            description: String::new(),
            date,
            shares: vec![SplitRequest::exact(recipient_id, amount)],
        }
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Shape-check the draft against the group it is recorded in
    ///
    /// Pure: no side effects beyond the check itself.
    pub fn validate(&self, roster: &Roster) -> Result<(), EntryValidationError> {
        if !self.amount.is_positive() {
            return Err(EntryValidationError::NonPositiveAmount(self.amount));
        }

        if self.group_id != roster.group.id {
            return Err(EntryValidationError::WrongGroup);
        }

        if !roster.contains(self.payer_id) {
            return Err(EntryValidationError::UnknownParticipant(self.payer_id));
        }

        if self.shares.is_empty() {
            return Err(EntryValidationError::NoSplitParticipants);
        }

        let mut seen = HashSet::with_capacity(self.shares.len());
        for share in &self.shares {
            if !roster.contains(share.participant_id) {
                return Err(EntryValidationError::UnknownParticipant(
                    share.participant_id,
                ));
            }
            if !seen.insert(share.participant_id) {
                return Err(EntryValidationError::DuplicateParticipant(
                    share.participant_id,
                ));
            }
        }

        if self.kind.is_transfer() {
            if self.shares.len() != 1 {
                return Err(EntryValidationError::TransferNeedsOneRecipient);
            }
            if self.policy != SplitPolicy::ExactAmount {
                return Err(EntryValidationError::TransferPolicy);
            }
            if self.shares[0].participant_id == self.payer_id {
                return Err(EntryValidationError::TransferToSelf);
            }
        }

        Ok(())
    }
}

/// Validation errors for ledger entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    NonPositiveAmount(Money),
    WrongGroup,
    UnknownParticipant(ParticipantId),
    DuplicateParticipant(ParticipantId),
    NoSplitParticipants,
    TransferNeedsOneRecipient,
    TransferPolicy,
    TransferToSelf,
}

impl EntryValidationError {
    /// Whether this error is a dangling reference rather than malformed input
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::WrongGroup | Self::UnknownParticipant(_))
    }
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Entry amount must be positive, got {}", amount)
            }
            Self::WrongGroup => write!(f, "Entry does not belong to this group"),
            Self::UnknownParticipant(id) => {
                write!(f, "Participant {} is not part of this group", id)
            }
            Self::DuplicateParticipant(id) => {
                write!(f, "Participant {} is listed more than once", id)
            }
            Self::NoSplitParticipants => {
                write!(f, "Entry needs at least one split participant")
            }
            Self::TransferNeedsOneRecipient => {
                write!(f, "Transfer needs exactly one recipient")
            }
            Self::TransferPolicy => {
                write!(f, "Transfers always move the exact full amount")
            }
            Self::TransferToSelf => write!(f, "Cannot transfer to the payer"),
        }
    }
}

impl std::error::Error for EntryValidationError {}
