//! Where Tally keeps its files
//!
//! The base directory is `$TALLY_DATA_DIR` when set, otherwise
//! `$XDG_CONFIG_HOME/tally` (falling back to `~/.config/tally`), or
//! `%APPDATA%\tally` on Windows. Under it:
//!
//! ```text
//! config.json          settings
//! audit.log            JSON-lines audit trail
//! data/groups.json
//! data/participants.json
//! data/entries.json    entries with their splits
//! data/settlements.json
//! exports/             default export destination
//! ```

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{TallyError, TallyResult};

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "TALLY_DATA_DIR";

#[derive(Debug, Clone)]
pub struct TallyPaths {
    base_dir: PathBuf,
}

impl TallyPaths {
    /// Resolve the base directory from the environment
    pub fn new() -> TallyResult<Self> {
        let base_dir = match non_empty_var(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => platform_config_dir()?.join("tally"),
        };
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn groups_file(&self) -> PathBuf {
        self.data_file("groups")
    }

    pub fn participants_file(&self) -> PathBuf {
        self.data_file("participants")
    }

    pub fn entries_file(&self) -> PathBuf {
        self.data_file("entries")
    }

    pub fn settlements_file(&self) -> PathBuf {
        self.data_file("settlements")
    }

    fn data_file(&self, name: &str) -> PathBuf {
        self.data_dir().join(name).with_extension("json")
    }

    /// Create the base and data directories if they're missing
    pub fn ensure_directories(&self) -> TallyResult<()> {
        let data_dir = self.data_dir();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            TallyError::Io(format!("Failed to create {}: {}", data_dir.display(), e))
        })
    }

    /// `tally init` has been run (the settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(not(windows))]
fn platform_config_dir() -> TallyResult<PathBuf> {
    if let Some(xdg) = non_empty_var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg));
    }
    non_empty_var("HOME")
        .map(|home| PathBuf::from(home).join(".config"))
        .ok_or_else(|| TallyError::Config("Could not determine home directory".into()))
}

#[cfg(windows)]
fn platform_config_dir() -> TallyResult<PathBuf> {
    non_empty_var("APPDATA")
        .map(PathBuf::from)
        .ok_or_else(|| TallyError::Config("Could not determine APPDATA directory".into()))
}
