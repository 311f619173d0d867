//! Generic helpers for the JSON snapshot file.
//!
//! The file is a single JSON document keyed by symbol; its field set is
//! forward-compatible, so callers deserialize with `#[serde(default)]`
//! on any field that might be absent from an older snapshot.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};

/// Path of the snapshot file for `symbol` under `data_dir`.
pub fn snapshot_path(data_dir: &str, symbol: &str) -> PathBuf {
    Path::new(data_dir).join(format!("{symbol}.snapshot.json"))
}

/// Read and parse the snapshot file, if present. Any I/O or parse error is
/// logged and treated as "no snapshot" — starting cold is always safe,
/// unlike a corrupt restore silently wedging the FSM.
pub async fn load<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(value) => {
                info!(path = %path.display(), "Restored snapshot");
                Some(value)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Snapshot file is unparseable, starting cold");
                None
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read snapshot file, starting cold");
            None
        }
    }
}

/// Overwrite the snapshot file with `value`. Creates the parent directory
/// if needed. Failures are logged and swallowed: the in-memory state
/// remains authoritative and the process keeps running.
pub async fn save<T: Serialize + Sync>(path: &Path, value: &T) {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            error!(path = %parent.display(), error = %e, "Failed to create snapshot directory");
            return;
        }
    }

    let body = match serde_json::to_vec_pretty(value) {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "Failed to serialize snapshot");
            return;
        }
    };

    if let Err(e) = tokio::fs::write(path, body).await {
        error!(path = %path.display(), error = %e, "Failed to write snapshot file");
    }
}
