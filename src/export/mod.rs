//! Export module for Tally
//!
//! Exports a single group in several formats:
//! - CSV: entries (one row per split) or balances, for spreadsheets
//! - JSON: the full group with derived balances and suggestions
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;

pub use self::csv::{export_balances_csv, export_entries_csv};
pub use json::{export_group_json, GroupExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_group_yaml;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Entries with their splits, one row per split
    Csv,
    /// Full group document, machine-readable
    Json,
    /// Full group document, human-readable
    Yaml,
}

impl ExportFormat {
    /// File extension for exported files
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
