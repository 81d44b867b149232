//! JSON snapshot file: the store is saved after each change and loaded at startup.

use crate::store::roster::{RosterStore, Snapshot};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Errors while reading or writing the data file.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "Data file I/O error: {}", e),
            PersistError::Json(e) => write!(f, "Data file is not valid JSON: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Json(e)
    }
}

/// Load the store from `path`. A missing file yields `None` so the caller can seed.
pub fn load(path: &Path) -> Result<Option<RosterStore>, PersistError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No data file at {}; starting fresh", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let snapshot: Snapshot = serde_json::from_str(&data)?;
    log::info!(
        "Loaded {} league(s) and {} match(es) from {}",
        snapshot.leagues.len(),
        snapshot.matches.len(),
        path.display()
    );
    Ok(Some(RosterStore::from_snapshot(snapshot)))
}

/// Write the whole store to `path` (via a temporary file renamed over it).
pub fn save(path: &Path, store: &RosterStore) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(&store.snapshot())?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::debug!("Saved store to {}", path.display());
    Ok(())
}
