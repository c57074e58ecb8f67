//! Tally - shared-expense tracking from the terminal
//!
//! This library records what a group of people spent on each other's behalf,
//! splits each amount exactly (equal, exact-amount or weighted shares), folds
//! the ledger into one net balance per person, and suggests the transfers
//! that would settle everyone up.
//!
//! # Layout
//!
//! - `models`: groups, participants, ledger entries, splits, settlements
//! - `engine`: pure split, balance and settlement arithmetic
//! - `storage`: the `LedgerStore` trait with JSON-file and in-memory stores
//! - `services`: validated operations that read and write through a store
//! - `audit`: append-only change log
//! - `config`, `logging`: settings, file locations, tracing setup
//! - `display`, `export`, `cli`: text tables, CSV/JSON/YAML, the command line
//!
//! # Settling up
//!
//! ```rust
//! use tally::models::{Money, ParticipantId};
//! use tally::engine::Balances;
//! use tally::suggest_settlements;
//!
//! let (a, b, c) = (ParticipantId::new(), ParticipantId::new(), ParticipantId::new());
//! let balances = Balances::from_pairs([
//!     (a, Money::from_cents(10000)),
//!     (b, Money::from_cents(-4000)),
//!     (c, Money::from_cents(-6000)),
//! ]);
//!
//! let transfers = suggest_settlements(&balances).unwrap();
//! assert_eq!(transfers.len(), 2);
//! assert!(balances.apply_transfers(&transfers).unwrap().is_settled());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use engine::{compute_balances, compute_splits, suggest_settlements};
pub use error::{TallyError, TallyResult};
