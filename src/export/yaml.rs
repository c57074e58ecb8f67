//! YAML Export functionality
//!
//! Same document as the JSON export, for people who want to read it.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::export::json::GroupExport;

/// Write the export as YAML, preceded by a comment header
pub fn export_group_yaml<W: Write>(export: &GroupExport, writer: &mut W) -> TallyResult<()> {
    let header = format!(
        "# Tally export of group '{}'\n# Generated: {}\n# App Version: {}\n\n",
        export.group.name, export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| TallyError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| TallyError::Export(e.to_string()))?;

    Ok(())
}
