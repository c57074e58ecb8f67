//! Service layer for tally
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, split computation, and audit logging. Services are
//! generic over [`LedgerStore`](crate::storage::LedgerStore) so they run the
//! same against the JSON files and the in-memory store.

pub mod balance;
pub mod entry;
pub mod group;
pub mod participant;
pub mod settlement;

pub use balance::{BalanceService, GroupSnapshot};
pub use entry::{EntryService, EntryUpdate};
pub use group::GroupService;
pub use participant::ParticipantService;
pub use settlement::SettlementService;
