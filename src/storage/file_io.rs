//! JSON file helpers for the repositories
//!
//! Writes go through a sibling `.tmp` file and a rename, so a crash mid-save
//! leaves the previous ledger file intact.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{TallyError, TallyResult};

fn persistence(what: &str, path: &Path, e: impl std::fmt::Display) -> TallyError {
    TallyError::Persistence(format!("Failed to {} {}: {}", what, path.display(), e))
}

/// Load a repository file; a file that was never written loads as `T::default()`
pub fn read_json<T, P>(path: P) -> TallyResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(persistence("read", path, e)),
    };
    serde_json::from_str(&text).map_err(|e| persistence("parse", path, e))
}

/// Replace `path` with the pretty-printed JSON of `data`, all or nothing
pub fn write_json_atomic<T, P>(path: P, data: &T) -> TallyResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| persistence("create directory for", path, e))?;
    }

    let staging = path.with_extension("json.tmp");
    let written = File::create(&staging)
        .map_err(|e| persistence("create", &staging, e))
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, data)
                .map_err(|e| persistence("serialize", path, e))?;
            out.flush().map_err(|e| persistence("flush", &staging, e))?;
            out.get_ref()
                .sync_all()
                .map_err(|e| persistence("sync", &staging, e))
        })
        .and_then(|()| fs::rename(&staging, path).map_err(|e| persistence("replace", path, e)));

    if written.is_err() {
        let _ = fs::remove_file(&staging);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Default, Serialize, Deserialize)]
    struct Ledger {
        names: Vec<String>,
        total_cents: i64,
    }

    fn trip() -> Ledger {
        Ledger {
            names: vec!["Alice".into(), "Bob".into()],
            total_cents: 9000,
        }
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let loaded: Ledger = read_json(dir.path().join("groups.json")).unwrap();
        assert_eq!(loaded, Ledger::default());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("groups.json");

        write_json_atomic(&path, &trip()).unwrap();
        assert_eq!(read_json::<Ledger, _>(&path).unwrap(), trip());
        assert!(!path.with_extension("json.tmp").exists());

        // Overwrite replaces the whole file
        write_json_atomic(&path, &Ledger::default()).unwrap();
        assert_eq!(read_json::<Ledger, _>(&path).unwrap(), Ledger::default());
    }

    #[test]
    fn test_corrupt_file_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("entries.json");
        fs::write(&path, "{ \"names\": [").unwrap();

        let err = read_json::<Ledger, _>(&path).unwrap_err();
        assert!(matches!(err, TallyError::Persistence(ref msg) if msg.contains("entries.json")));
    }
}
