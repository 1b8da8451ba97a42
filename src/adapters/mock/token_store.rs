//! In-memory token store for testing.
//!
//! Stores the token in memory and can be told to fail any operation, so
//! session tests can exercise the storage error paths without a file system.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::traits::TokenStore;

/// In-memory token store for testing.
///
/// Clones share the same storage, which is how tests simulate a process
/// restart: build a second `SessionManager` over a clone of the store.
///
/// # Example
///
/// ```ignore
/// use hai::adapters::mock::InMemoryTokenStore;
/// use hai::traits::TokenStore;
///
/// let store = InMemoryTokenStore::new();
/// assert!(store.get().await?.is_none());
///
/// store.set("session-token").await?;
/// assert_eq!(store.get().await?, Some("session-token".to_string()));
///
/// store.clear().await?;
/// assert!(store.get().await?.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
    get_should_fail: Arc<Mutex<bool>>,
    set_should_fail: Arc<Mutex<bool>>,
    clear_should_fail: Arc<Mutex<bool>>,
    writes: Arc<Mutex<usize>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token.
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set_token(Some(token.to_string()));
        store
    }

    /// Configure whether get should fail.
    pub fn set_get_should_fail(&self, should_fail: bool) {
        *self.get_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether set should fail.
    pub fn set_set_should_fail(&self, should_fail: bool) {
        *self.set_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether clear should fail.
    pub fn set_clear_should_fail(&self, should_fail: bool) {
        *self.clear_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the stored token synchronously (for assertions).
    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// Replace the stored token synchronously.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }

    /// Number of successful `set` and `clear` calls.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self) -> Result<Option<String>, StorageError> {
        if *self.get_should_fail.lock().unwrap() {
            return Err(StorageError::ReadFailed {
                message: "Mock read failure".to_string(),
            });
        }

        Ok(self.token.lock().unwrap().clone().filter(|t| !t.is_empty()))
    }

    async fn set(&self, token: &str) -> Result<(), StorageError> {
        if *self.set_should_fail.lock().unwrap() {
            return Err(StorageError::WriteFailed {
                message: "Mock write failure".to_string(),
            });
        }

        *self.token.lock().unwrap() = Some(token.to_string());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        if *self.clear_should_fail.lock().unwrap() {
            return Err(StorageError::ClearFailed {
                message: "Mock clear failure".to_string(),
            });
        }

        *self.token.lock().unwrap() = None;
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let store = InMemoryTokenStore::new();
        assert!(store.get().await.unwrap().is_none());

        store.set("tok").await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some("tok".to_string()));

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = InMemoryTokenStore::new();
        let other = store.clone();
        store.set("shared").await.unwrap();
        assert_eq!(other.get().await.unwrap(), Some("shared".to_string()));
    }

    #[tokio::test]
    async fn test_empty_token_reads_as_none() {
        let store = InMemoryTokenStore::with_token("");
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryTokenStore::with_token("tok");

        store.set_get_should_fail(true);
        assert!(matches!(
            store.get().await,
            Err(StorageError::ReadFailed { .. })
        ));

        store.set_set_should_fail(true);
        assert!(matches!(
            store.set("new").await,
            Err(StorageError::WriteFailed { .. })
        ));
        assert_eq!(store.token(), Some("tok".to_string()));

        store.set_clear_should_fail(true);
        assert!(matches!(
            store.clear().await,
            Err(StorageError::ClearFailed { .. })
        ));
        assert_eq!(store.token(), Some("tok".to_string()));
    }
}
