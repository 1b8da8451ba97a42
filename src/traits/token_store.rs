//! Token store trait abstraction.
//!
//! Durable key-value persistence for a single opaque session token. The
//! production implementation is a JSON file; tests use an in-memory store.

use async_trait::async_trait;

use crate::error::StorageError;

/// Durable storage for the session token.
///
/// Implementations must tolerate being backed by any key-value medium:
/// `get` after `set(t)` returns `Some(t)` across process restarts, and
/// `clear` on an empty store succeeds.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Read the stored token.
    ///
    /// # Returns
    /// - `Ok(Some(token))` if a non-empty token is stored
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if the medium could not be read
    async fn get(&self) -> Result<Option<String>, StorageError>;

    /// Store the token, replacing any previous one.
    async fn set(&self, token: &str) -> Result<(), StorageError>;

    /// Remove the stored token.
    async fn clear(&self) -> Result<(), StorageError>;
}
