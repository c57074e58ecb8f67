//! Audit logging system for Tally
//!
//! Records every create, update and delete of groups, participants, ledger
//! entries and settlements in an append-only log, one JSON object per line.
//!
//! - `AuditEntry`: one recorded operation with timestamp, entity information,
//!   and optional before/after values.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//!
//! # Example
//!
//! ```rust,ignore
//! use tally::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(
//!     EntityType::Group,
//!     group.id.to_string(),
//!     Some(group.name.clone()),
//!     &group,
//! ))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
