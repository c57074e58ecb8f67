//! JSON-lines audit log on disk

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{TallyError, TallyResult};

use super::entry::AuditEntry;

/// Appends `AuditEntry` records to a file, one JSON object per line
pub struct AuditLogger {
    log_path: PathBuf,
}

fn io_error(action: &str, e: std::io::Error) -> TallyError {
    TallyError::Io(format!("Failed to {} audit log: {}", action, e))
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, entry: &AuditEntry) -> TallyResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several records and flush once
    pub fn log_batch(&self, entries: &[AuditEntry]) -> TallyResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        if let Some(dir) = self.log_path.parent() {
            fs::create_dir_all(dir).map_err(|e| io_error("create directory for", e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| io_error("open", e))?;
        let mut out = BufWriter::new(file);

        for entry in entries {
            serde_json::to_writer(&mut out, entry)
                .map_err(|e| TallyError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            out.write_all(b"\n").map_err(|e| io_error("write", e))?;
        }
        out.flush().map_err(|e| io_error("flush", e))?;

        debug!(count = entries.len(), path = %self.log_path.display(), "appended audit entries");
        Ok(())
    }

    /// Every record, oldest first; a missing file is an empty log
    pub fn read_all(&self) -> TallyResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("open", e)),
        };

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| io_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(&line).map_err(|e| {
                TallyError::Json(format!("Bad audit entry on line {}: {}", index + 1, e))
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// The last `count` records, oldest first
    pub fn read_recent(&self, count: usize) -> TallyResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let skip = entries.len().saturating_sub(count);
        entries.drain(..skip);
        Ok(entries)
    }
}
