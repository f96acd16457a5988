//! Curated best-seller positions, kept in a JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::Mutex;

use launchdesk_products::BestsellerPosition;

#[derive(Debug, Error)]
pub enum PositionsError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid positions file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Pretty-printed JSON array of `{productId, position}` entries.
///
/// A missing file reads as an empty list. Writes replace the whole file.
#[derive(Debug)]
pub struct BestsellerPositionsFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl BestsellerPositionsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PositionsError {
        PositionsError::Io {
            path: self.path.clone(),
            source,
        }
    }

    pub async fn read(&self) -> Result<Vec<BestsellerPosition>, PositionsError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(|source| PositionsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    pub async fn write(&self, positions: &[BestsellerPosition]) -> Result<(), PositionsError> {
        let body = serde_json::to_string_pretty(positions).map_err(|source| {
            PositionsError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| self.io_error(e))?;

        tracing::info!(path = %self.path.display(), count = positions.len(), "best-seller positions saved");
        Ok(())
    }
}
