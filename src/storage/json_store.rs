//! JSON file backend. The whole book lives in one pretty-printed file;
//! saves go through a sibling temp file and an atomic rename so a crash
//! mid-write never leaves a torn snapshot behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::domain::book::Snapshot;
use crate::storage::traits::SnapshotStore;

pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Open a store backed by the given file, creating the parent
    /// directory if needed. The file itself is created on first save.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create data directory {}", parent.display())
                })?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            info!("no book file at {}, starting empty", self.path.display());
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let temp = self.temp_path();
        fs::write(&temp, json)
            .with_context(|| format!("failed to write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
