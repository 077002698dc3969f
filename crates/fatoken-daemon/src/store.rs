// crates/fatoken-daemon/src/store.rs
//
// SnapshotStore: the ledger's on-disk persistence.
//
// The whole storage is written as one JSON document. Writes go to a
// temporary file that is renamed over the snapshot, so a crash mid-write
// leaves the previous snapshot intact.

use std::fs;
use std::path::{Path, PathBuf};

use fatoken_core::error::LedgerError;
use fatoken_ledger::{Ledger, StorageSnapshot};

const SNAPSHOT_FILE: &str = "ledger.json";
const SNAPSHOT_TMP_FILE: &str = "ledger.json.tmp";

/// JSON snapshot file inside the daemon's data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open the store, creating `dir` if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            LedgerError::Storage(format!("cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    /// Load and validate the stored ledger. `Ok(None)` when nothing has been
    /// saved yet.
    pub fn load(&self) -> Result<Option<Ledger>, LedgerError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(|e| {
            LedgerError::Storage(format!("cannot read {}: {}", path.display(), e))
        })?;
        let snapshot: StorageSnapshot = serde_json::from_str(&contents)
            .map_err(|e| LedgerError::CorruptSnapshot(format!("{}: {}", path.display(), e)))?;
        Ledger::restore(snapshot).map(Some)
    }

    /// Atomically replace the stored snapshot.
    pub fn save(&self, snapshot: &StorageSnapshot) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.dir.join(SNAPSHOT_TMP_FILE);
        fs::write(&tmp, json).map_err(|e| {
            LedgerError::Storage(format!("cannot write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, self.path()).map_err(|e| {
            LedgerError::Storage(format!("cannot replace {}: {}", self.path().display(), e))
        })?;
        Ok(())
    }
}
