use std::{
    io::Error,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use futures::StreamExt;

use crate::{config, types::RecentlyPlayedResponse, utils};

#[derive(Debug)]
pub enum SnapshotError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for SnapshotError {
    fn from(err: Error) -> Self {
        SnapshotError::IoError(err)
    }
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::IoError(e) => write!(f, "io error: {}", e),
            SnapshotError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Persists one immutable snapshot file per non-empty fetch.
///
/// Snapshots are named by the wall-clock time of the fetch at second
/// resolution and hold the full nested batch structure as returned by the
/// API. They are never mutated or deleted by this tool; the export command
/// reads all of them back in name order.
pub struct SnapshotManager {
    dir: PathBuf,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self {
            dir: config::data_dir().join("snapshots"),
        }
    }

    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn write(
        &self,
        batch: &RecentlyPlayedResponse,
        timestamp: DateTime<Utc>,
    ) -> Result<PathBuf, SnapshotError> {
        async_fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SnapshotError::IoError(e))?;

        let path = self.dir.join(utils::snapshot_file_name(timestamp));
        let json = serde_json::to_string_pretty(batch).map_err(|e| SnapshotError::SerdeError(e))?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| SnapshotError::IoError(e))?;
        Ok(path)
    }

    /// Snapshot paths in file name order.
    ///
    /// The timestamp naming scheme makes lexicographic order chronological.
    /// A missing snapshot directory means no run has persisted anything yet
    /// and yields an empty list.
    pub async fn list(&self) -> Result<Vec<PathBuf>, SnapshotError> {
        let mut entries = match async_fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotError::IoError(e)),
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next().await {
            let entry = entry.map_err(|e| SnapshotError::IoError(e))?;
            let path = entry.path();
            let is_snapshot = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(utils::SNAPSHOT_SUFFIX));
            if is_snapshot {
                paths.push(path);
            }
        }

        paths.sort();
        Ok(paths)
    }

    pub async fn load(&self, path: &Path) -> Result<RecentlyPlayedResponse, SnapshotError> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| SnapshotError::IoError(e))?;
        serde_json::from_str(&content).map_err(|e| SnapshotError::SerdeError(e))
    }
}
