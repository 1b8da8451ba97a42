//! File-based token store adapter.
//!
//! Persists the session token as JSON in `~/.hai/.session.json`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::StorageError;
use crate::traits::TokenStore;

/// The session directory name.
const SESSION_DIR: &str = ".hai";

/// The session file name.
const SESSION_FILE: &str = ".session.json";

/// On-disk layout of the session file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoredSession {
    /// Opaque bearer token issued by the backend login exchange.
    pub access_token: Option<String>,
    /// When the token was written, as a Unix timestamp.
    #[serde(default)]
    pub saved_at: Option<i64>,
}

/// File-based token store.
///
/// Without a home directory the store still exists, but every operation
/// fails with [`StorageError::NoHomeDirectory`].
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: Option<PathBuf>,
}

impl FileTokenStore {
    /// Create a store at the default location in the home directory.
    pub fn new() -> Self {
        Self::in_home(dirs::home_dir())
    }

    /// Create a store under `home`, if there is one.
    pub fn in_home(home: Option<PathBuf>) -> Self {
        let path = home.map(|home| home.join(SESSION_DIR).join(SESSION_FILE));
        if path.is_none() {
            warn!("No home directory, the session will not be saved");
        }
        Self { path }
    }

    /// Create a store at an explicit path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Path to the session file, if one could be resolved.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn resolved(&self) -> Result<&Path, StorageError> {
        self.path().ok_or(StorageError::NoHomeDirectory)
    }

    async fn read_session(&self) -> Result<Option<StoredSession>, StorageError> {
        let path = self.resolved()?;
        let contents = match tokio::fs::read(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::from_io(&e, path, "read")),
        };

        serde_json::from_slice(&contents)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<String>, StorageError> {
        let session = self.read_session().await?;
        Ok(session
            .and_then(|s| s.access_token)
            .filter(|token| !token.trim().is_empty()))
    }

    async fn set(&self, token: &str) -> Result<(), StorageError> {
        let path = self.resolved()?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::from_io(&e, parent, "write"))?;
        }

        let session = StoredSession {
            access_token: Some(token.to_string()),
            saved_at: Some(chrono::Utc::now().timestamp()),
        };
        let json = serde_json::to_vec_pretty(&session).map_err(|e| StorageError::WriteFailed {
            message: e.to_string(),
        })?;

        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| StorageError::from_io(&e, &tmp, "write"))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| StorageError::from_io(&e, path, "write"))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let path = self.resolved()?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(&e, path, "clear")),
        }
    }
}
