//! Token persistence error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of the durable token store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Failed to read session token: {message}")]
    ReadFailed { message: String },

    #[error("Failed to write session token: {message}")]
    WriteFailed { message: String },

    #[error("Failed to clear session token: {message}")]
    ClearFailed { message: String },

    /// The stored file exists but does not parse.
    #[error("Session file {} is corrupt: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },

    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

impl StorageError {
    /// Build a storage error from an I/O failure.
    ///
    /// `operation` is one of "read", "write" or "clear".
    pub fn from_io(err: &std::io::Error, path: &std::path::Path, operation: &str) -> Self {
        let message = format!("{} ({})", err, path.display());
        match operation {
            "read" => StorageError::ReadFailed { message },
            "clear" => StorageError::ClearFailed { message },
            _ => StorageError::WriteFailed { message },
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StorageError::ReadFailed { .. } | StorageError::Corrupt { .. } => {
                "Your saved session could not be loaded. Please sign in again.".to_string()
            }
            StorageError::WriteFailed { .. } => {
                "Your session could not be saved and will not survive a restart.".to_string()
            }
            StorageError::ClearFailed { .. } => {
                "Your saved session could not be removed from this device.".to_string()
            }
            StorageError::NoHomeDirectory => {
                "Could not find a home directory to store your session in.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::ReadFailed { .. } => "E_STORE_READ",
            StorageError::WriteFailed { .. } => "E_STORE_WRITE",
            StorageError::ClearFailed { .. } => "E_STORE_CLEAR",
            StorageError::Corrupt { .. } => "E_STORE_CORRUPT",
            StorageError::NoHomeDirectory => "E_STORE_NO_HOME",
        }
    }
}
