//! Session lifecycle: restore, sign-in, sign-out, invalidate.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::state::{Session, SessionHandle, SessionStatus};
use crate::error::{AuthError, HaiError, HaiResult};
use crate::traits::TokenStore;

/// Owns the process-wide session and its durable copy.
///
/// State is published through a watch channel. Each operation replaces the
/// whole [`Session`] value before it returns, so subscribers never see a
/// token without `Authenticated` status or the reverse.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
}

impl SessionManager {
    /// Create a manager in the `Unauthenticated` state.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::unauthenticated());
        Self { store, state }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Read side for dependents such as the backend client.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.state.subscribe())
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Load the persisted token once at startup.
    ///
    /// Publishes `Restoring` immediately, then `Authenticated` or
    /// `Unauthenticated`. A storage failure is logged and treated as "no
    /// token". If a sign-in or sign-out lands while the store is being read,
    /// that newer state wins.
    pub async fn restore(&self) -> Session {
        self.state.send_replace(Session::restoring());
        debug!("Restoring session from token store");

        let restored = match self.store.get().await {
            Ok(Some(token)) if !token.trim().is_empty() => Session::authenticated(token),
            Ok(_) => Session::unauthenticated(),
            Err(e) => {
                warn!(error_code = e.error_code(), "Failed to load session token: {}", e);
                Session::unauthenticated()
            }
        };

        self.state.send_if_modified(|current| {
            if current.status() == SessionStatus::Restoring {
                *current = restored;
                true
            } else {
                false
            }
        });

        let session = self.current();
        info!(status = ?session.status(), "Session restored");
        session
    }

    /// Start an authenticated session with a token from the login exchange.
    ///
    /// The in-memory session is switched before the durable write. If the
    /// write fails the session stays active for this process and the
    /// storage error is returned so the caller can warn the user.
    pub async fn sign_in(&self, token: &str) -> HaiResult<()> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidToken {
                message: "token is empty".to_string(),
            }
            .into());
        }

        self.state.send_replace(Session::authenticated(token));
        info!("Signed in");

        self.store.set(token).await.map_err(|e| {
            warn!(error_code = e.error_code(), "Session token not persisted: {}", e);
            HaiError::from(e)
        })
    }

    /// End the session and remove the durable token.
    ///
    /// Idempotent: when already signed out no change is published. The
    /// in-memory reset always happens; a failure to clear the store is
    /// returned afterwards.
    pub async fn sign_out(&self) -> HaiResult<()> {
        let changed = self.state.send_if_modified(|current| {
            if *current == Session::unauthenticated() {
                false
            } else {
                *current = Session::unauthenticated();
                true
            }
        });
        if changed {
            info!("Signed out");
        }

        self.store.clear().await.map_err(|e| {
            warn!(error_code = e.error_code(), "Session token not cleared: {}", e);
            HaiError::from(e)
        })
    }

    /// Drop a session the backend no longer accepts.
    pub async fn invalidate(&self, reason: &str) -> HaiResult<()> {
        if self.current().is_authenticated() {
            warn!("Session invalidated: {}", reason);
        }
        self.sign_out().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemoryTokenStore;
    use crate::error::StorageError;

    fn manager_with(store: &InMemoryTokenStore) -> SessionManager {
        SessionManager::new(Arc::new(store.clone()))
    }

    #[test]
    fn test_new_is_unauthenticated() {
        let manager = manager_with(&InMemoryTokenStore::new());
        assert_eq!(manager.current(), Session::unauthenticated());
    }

    #[tokio::test]
    async fn test_restore_with_stored_token() {
        let store = InMemoryTokenStore::with_token("persisted");
        let manager = manager_with(&store);

        let session = manager.restore().await;

        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_restore_without_token() {
        let manager = manager_with(&InMemoryTokenStore::new());
        let session = manager.restore().await;
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_restore_fails_open_on_storage_error() {
        let store = InMemoryTokenStore::with_token("persisted");
        store.set_get_should_fail(true);
        let manager = manager_with(&store);

        let session = manager.restore().await;

        assert_eq!(session, Session::unauthenticated());
    }

    #[tokio::test]
    async fn test_restore_publishes_restoring_first() {
        // The watch channel only keeps the latest value, so observe the
        // intermediate state from inside the store read.
        struct ObservingStore {
            rx: watch::Receiver<Session>,
            seen: std::sync::Mutex<Option<SessionStatus>>,
        }

        #[async_trait::async_trait]
        impl TokenStore for ObservingStore {
            async fn get(&self) -> Result<Option<String>, StorageError> {
                *self.seen.lock().unwrap() = Some(self.rx.borrow().status());
                Ok(Some("tok".to_string()))
            }
            async fn set(&self, _: &str) -> Result<(), StorageError> {
                Ok(())
            }
            async fn clear(&self) -> Result<(), StorageError> {
                Ok(())
            }
        }

        let (state, _) = watch::channel(Session::unauthenticated());
        let store = Arc::new(ObservingStore {
            rx: state.subscribe(),
            seen: std::sync::Mutex::new(None),
        });
        let observed = SessionManager {
            store: store.clone(),
            state,
        };

        observed.restore().await;
        assert_eq!(*store.seen.lock().unwrap(), Some(SessionStatus::Restoring));
        assert!(observed.current().is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_then_restart_restores_same_token() {
        let store = InMemoryTokenStore::new();
        let first = manager_with(&store);
        first.sign_in("token-T").await.unwrap();
        drop(first);

        let second = manager_with(&store);
        let session = second.restore().await;

        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("token-T"));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_empty_token() {
        let store = InMemoryTokenStore::new();
        let manager = manager_with(&store);

        let err = manager.sign_in("   ").await.unwrap_err();

        assert!(matches!(err, HaiError::Auth(AuthError::InvalidToken { .. })));
        assert_eq!(manager.current(), Session::unauthenticated());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_sign_in_write_failure_keeps_memory_session() {
        let store = InMemoryTokenStore::new();
        store.set_set_should_fail(true);
        let manager = manager_with(&store);

        let err = manager.sign_in("tok").await.unwrap_err();

        assert!(matches!(err, HaiError::Storage(StorageError::WriteFailed { .. })));
        assert!(manager.current().is_authenticated());
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_handle_sees_sign_in_and_sign_out_immediately() {
        let manager = manager_with(&InMemoryTokenStore::new());
        let handle = manager.handle();

        manager.sign_in("tok").await.unwrap();
        assert_eq!(handle.token(), Some("tok".to_string()));

        manager.sign_out().await.unwrap();
        assert!(handle.token().is_none());
        assert_eq!(handle.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_out_is_idempotent() {
        let store = InMemoryTokenStore::new();
        let manager = manager_with(&store);
        manager.sign_in("tok").await.unwrap();

        manager.sign_out().await.unwrap();
        let after_once = (manager.current(), store.token());

        let mut rx = manager.subscribe();
        rx.borrow_and_update();
        manager.sign_out().await.unwrap();

        assert_eq!((manager.current(), store.token()), after_once);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(manager.current(), Session::unauthenticated());
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_sign_out_clear_failure_still_resets_memory() {
        let store = InMemoryTokenStore::new();
        let manager = manager_with(&store);
        manager.sign_in("tok").await.unwrap();
        store.set_clear_should_fail(true);

        let err = manager.sign_out().await.unwrap_err();

        assert!(matches!(err, HaiError::Storage(StorageError::ClearFailed { .. })));
        assert_eq!(manager.current(), Session::unauthenticated());
    }

    #[tokio::test]
    async fn test_invalidate_resets_session_and_storage() {
        let store = InMemoryTokenStore::new();
        let manager = manager_with(&store);
        manager.sign_in("stale").await.unwrap();

        manager.invalidate("backend returned 401").await.unwrap();

        assert_eq!(manager.current(), Session::unauthenticated());
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_are_notified() {
        let manager = manager_with(&InMemoryTokenStore::new());
        let mut rx = manager.subscribe();

        manager.sign_in("tok").await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
    }
}
