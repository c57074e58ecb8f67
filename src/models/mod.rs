//! Core data models for Tally
//!
//! This module contains the data structures of the shared-expense domain:
//! groups, participants, ledger entries with their splits, and settlements.

pub mod entry;
pub mod group;
pub mod ids;
pub mod money;
pub mod participant;
pub mod settlement;

pub use entry::{
    EntryDraft, EntryKind, EntryValidationError, LedgerEntry, Split, SplitPolicy, SplitRequest,
};
pub use group::{Group, GroupValidationError, Roster};
pub use ids::{EntryId, GroupId, ParticipantId, SettlementId, SplitId};
pub use money::{Money, MoneyParseError};
pub use participant::{Participant, ParticipantValidationError};
pub use settlement::{Settlement, SettlementValidationError};
