//! CSV Export functionality
//!
//! Exports a group's entries (one row per split) and its per-participant
//! balances to spreadsheet-friendly CSV. Amounts are plain decimals without
//! a currency symbol.

use std::io::Write;

use crate::error::{TallyError, TallyResult};
use crate::services::GroupSnapshot;

fn export_error(e: csv::Error) -> TallyError {
    TallyError::Export(e.to_string())
}

/// Export every entry of the group, one row per split
pub fn export_entries_csv<W: Write>(snapshot: &GroupSnapshot, writer: W) -> TallyResult<()> {
    let roster = &snapshot.roster;
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "Entry ID",
        "Date",
        "Kind",
        "Description",
        "Paid By",
        "Amount",
        "Split Policy",
        "Participant",
        "Share",
    ])
    .map_err(export_error)?;

    for entry in &snapshot.entries {
        let id = entry.id.as_uuid().to_string();
        let date = entry.date.format("%Y-%m-%d").to_string();
        let kind = entry.kind.to_string();
        let payer = roster.name_of(entry.payer_id);
        let amount = entry.amount.to_decimal_string();
        let policy = entry.policy.to_string();

        for split in &entry.splits {
            wtr.write_record([
                id.as_str(),
                date.as_str(),
                kind.as_str(),
                entry.description.as_str(),
                payer.as_str(),
                amount.as_str(),
                policy.as_str(),
                roster.name_of(split.participant_id).as_str(),
                split.amount.to_decimal_string().as_str(),
            ])
            .map_err(export_error)?;
        }
    }

    wtr.flush().map_err(|e| TallyError::Export(e.to_string()))?;
    Ok(())
}

/// Export each participant's balance breakdown
pub fn export_balances_csv<W: Write>(snapshot: &GroupSnapshot, writer: W) -> TallyResult<()> {
    let summaries = snapshot.summaries()?;
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "Participant",
        "Paid",
        "Collected",
        "Share",
        "Sent",
        "Received",
        "Balance",
    ])
    .map_err(export_error)?;

    for summary in &summaries {
        let row = [
            snapshot.roster.name_of(summary.participant_id),
            summary.paid.to_decimal_string(),
            summary.collected.to_decimal_string(),
            summary.share.to_decimal_string(),
            summary.sent.to_decimal_string(),
            summary.received.to_decimal_string(),
            summary.balance.to_decimal_string(),
        ];
        wtr.write_record(&row).map_err(export_error)?;
    }

    wtr.flush().map_err(|e| TallyError::Export(e.to_string()))?;
    Ok(())
}
