//! File storage behind the `/files/` routes.
//!
//! Names are resolved relative to a fixed base directory. Reads and writes
//! are not coordinated with each other; concurrent access to one name is
//! left to the filesystem.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Flat named byte storage.
pub trait Storage: Send + Sync {
    fn read_file(&self, name: &str) -> impl Future<Output = Result<Vec<u8>, StorageError>> + Send;

    fn write_file(
        &self,
        name: &str,
        contents: &[u8],
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// [`Storage`] backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_directory: PathBuf,
}

impl FileStore {
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    /// Joins `name` onto the base directory. Names that are empty or would
    /// leave the directory (`..`, absolute paths) resolve to nothing.
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let mut components = relative.components().peekable();
        components.peek()?;

        if components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
            Some(self.base_directory.join(relative))
        } else {
            None
        }
    }
}

impl Storage for FileStore {
    async fn read_file(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        tokio::fs::read(&path).await.map_err(|source| match source.kind() {
            // Anything that cannot be opened counts as absent
            ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::IsADirectory => {
                StorageError::NotFound(name.to_string())
            }
            _ => StorageError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    async fn write_file(&self, name: &str, contents: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(name).ok_or_else(|| StorageError::NotFound(name.to_string()))?;

        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| StorageError::Io {
                name: name.to_string(),
                source,
            })
    }
}
