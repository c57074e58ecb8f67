//! Balance and settlement engine
//!
//! Pure computation over in-memory values: splitting entry amounts, folding a
//! group's ledger into net balances, and suggesting settling transfers.
//! Nothing here touches storage.

pub mod balances;
pub mod settle;
pub mod splits;

pub use balances::{
    compute_balances, summarize_participants, Balances, ParticipantBalance, ParticipantSummary,
};
pub use settle::{
    suggest_settlements, ExactSettlement, GreedySettlement, SettlementStrategy, StrategyKind,
    SuggestedTransfer, MAX_EXACT_PARTICIPANTS,
};
pub use splits::{compute_splits, compute_splits_for_payer, equal_shares, EXACT_TOLERANCE};
