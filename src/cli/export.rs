//! CLI command for data export

use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::{resolve_group, select_strategy};
use crate::config::settings::Settings;
use crate::error::{TallyError, TallyResult};
use crate::export::{
    export_balances_csv, export_entries_csv, export_group_json, export_group_yaml, ExportFormat,
    GroupExport,
};
use crate::services::BalanceService;
use crate::storage::Storage;

/// Arguments for `tally export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Group name or ID
    pub group: String,

    /// Export format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Output file path (default: the exports directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// CSV only: export balances instead of entries
    #[arg(long)]
    pub balances: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Strategy for the suggestions included in JSON/YAML exports
    #[arg(long)]
    pub strategy: Option<String>,
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> TallyResult<()> {
    let group = resolve_group(storage, &args.group)?;
    let snapshot = BalanceService::new(storage).snapshot(group.id)?;

    let output = match args.output {
        Some(path) => path,
        None => {
            let dir = storage.paths().export_dir();
            std::fs::create_dir_all(&dir).map_err(|e| {
                TallyError::Export(format!(
                    "Failed to create export directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            dir.join(default_file_name(&group.name, args.format, args.balances))
        }
    };

    let file = File::create(&output).map_err(|e| {
        TallyError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    match args.format {
        ExportFormat::Csv if args.balances => export_balances_csv(&snapshot, &mut writer)?,
        ExportFormat::Csv => export_entries_csv(&snapshot, &mut writer)?,
        ExportFormat::Json | ExportFormat::Yaml => {
            let strategy = select_strategy(settings, args.strategy.as_deref())?;
            let export = GroupExport::build(&snapshot, strategy.as_ref())?;
            if args.format == ExportFormat::Json {
                export_group_json(&export, &mut writer, args.pretty)?;
            } else {
                export_group_yaml(&export, &mut writer)?;
            }
        }
    }

    println!(
        "Exported {} ({} entries, {} settlements) to: {}",
        group.name,
        snapshot.entries.len(),
        snapshot.settlements.len(),
        output.display()
    );

    Ok(())
}

fn default_file_name(group_name: &str, format: ExportFormat, balances: bool) -> String {
    let slug: String = group_name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let suffix = if balances && format == ExportFormat::Csv {
        "-balances"
    } else {
        ""
    };
    format!(
        "{}{}-{}.{}",
        slug.trim_matches('-'),
        suffix,
        chrono::Local::now().format("%Y%m%d"),
        format.extension()
    )
}
