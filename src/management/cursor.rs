use std::{io::Error, io::ErrorKind, path::PathBuf};

use crate::config;

#[derive(Debug)]
pub enum CursorError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for CursorError {
    fn from(err: Error) -> Self {
        CursorError::IoError(err)
    }
}

impl std::fmt::Display for CursorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CursorError::IoError(e) => write!(f, "io error: {}", e),
            CursorError::SerdeError(e) => write!(f, "serde error: {}", e),
        }
    }
}

/// Persists the opaque `after` pagination cursor across runs.
///
/// One cursor per installation. A missing file is a regular condition (the
/// very first run) and surfaces as `Ok(None)` from [`CursorManager::load`],
/// never as an error.
pub struct CursorManager {
    path: PathBuf,
}

impl CursorManager {
    pub fn new() -> Self {
        Self {
            path: config::data_dir().join("state/after.json"),
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn load(&self) -> Result<Option<String>, CursorError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CursorError::IoError(e)),
        };

        let cursor: String =
            serde_json::from_str(&content).map_err(|e| CursorError::SerdeError(e))?;
        Ok(Some(cursor))
    }

    // Write-to-temp-then-rename so a crash mid-write never leaves a
    // half-written cursor file behind.
    pub async fn persist(&self, cursor: &str) -> Result<(), CursorError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| CursorError::IoError(e))?;
        }

        let json = serde_json::to_string(cursor).map_err(|e| CursorError::SerdeError(e))?;
        let tmp = self.path.with_extension("json.tmp");
        async_fs::write(&tmp, json)
            .await
            .map_err(|e| CursorError::IoError(e))?;
        async_fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CursorError::IoError(e))
    }
}
