//! Audit log CLI command

use clap::Args;

use crate::error::TallyResult;
use crate::storage::Storage;

/// Arguments for `tally audit`
#[derive(Args)]
pub struct AuditArgs {
    /// Number of most recent entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Print the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, args: AuditArgs) -> TallyResult<()> {
    let entries = storage.audit_logger().read_recent(args.limit)?;
    if entries.is_empty() {
        println!("No audit entries yet.");
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
