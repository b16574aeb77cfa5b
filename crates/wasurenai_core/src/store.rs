use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{group::Group, history::CompletionHistory, item::Item};

/// Everything the app persists, saved and loaded as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub groups: Vec<Group>,
    pub histories: Vec<CompletionHistory>,
}

/// Store failures are returned to the caller as values; the core never
/// aborts on open nor swallows a failed save.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Flat-file JSON persistence for the snapshot.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty snapshot, not an error.
    pub fn load(&self) -> Result<Snapshot, StoreError> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write to a temp sibling and rename, so a failed save never
    /// truncates the previous snapshot.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::CoreConfig, group::default_groups, item::ItemDraft};

    #[test]
    fn missing_file_loads_as_empty_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path().join("does-not-exist.json"));
        let snapshot = store.load().expect("load");
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonStore::open(dir.path().join("data").join("wasurenai.json"));

        let snapshot = Snapshot {
            items: vec![
                Item::create(ItemDraft::new("歯ブラシ", 30), &CoreConfig::default()).unwrap(),
            ],
            groups: default_groups(),
            histories: Vec::new(),
        };
        store.save(&snapshot).expect("save");
        let reloaded = store.load().expect("reload");
        assert_eq!(reloaded, snapshot);
    }

    #[test]
    fn corrupt_file_surfaces_a_typed_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json at all").expect("write fixture");
        let error = JsonStore::open(&path).load().expect_err("must fail");
        assert!(matches!(error, StoreError::Encoding(_)));
    }
}
