//! Session value published by the session manager.

use std::fmt;

use tokio::sync::watch;

/// Lifecycle status of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// No token. The login screen is shown.
    #[default]
    Unauthenticated,
    /// Reading the persisted token at startup.
    Restoring,
    /// A token is present and attached to backend calls.
    Authenticated,
}

/// Current session: token and status, always updated together.
///
/// The constructors are the only way to build a value, so a token exists
/// exactly when the status is `Authenticated`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Session {
    token: Option<String>,
    status: SessionStatus,
}

impl Session {
    pub fn unauthenticated() -> Self {
        Self::default()
    }

    pub fn restoring() -> Self {
        Self {
            token: None,
            status: SessionStatus::Restoring,
        }
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            status: SessionStatus::Authenticated,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("status", &self.status)
            .finish()
    }
}

/// Read-only view of the session, cheap to clone.
///
/// Every read sees the value most recently published by the manager; there
/// is no caching, so a reader can never observe a stale token once a
/// sign-in or sign-out call has returned.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<Session>,
}

impl SessionHandle {
    pub(crate) fn new(rx: watch::Receiver<Session>) -> Self {
        Self { rx }
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.rx.borrow().clone()
    }

    /// Current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        self.rx.borrow().token.clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.rx.borrow().status
    }

    /// Wait until startup restoration has finished and return the settled session.
    pub async fn wait_until_settled(&self) -> Session {
        let mut rx = self.rx.clone();
        let settled = match rx
            .wait_for(|session| session.status != SessionStatus::Restoring)
            .await
        {
            Ok(session) => session.clone(),
            // Manager dropped: whatever was last published is final.
            Err(_) => self.current(),
        };
        settled
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_keep_token_and_status_consistent() {
        let session = Session::unauthenticated();
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
        assert!(session.token().is_none());

        let session = Session::restoring();
        assert_eq!(session.status(), SessionStatus::Restoring);
        assert!(session.token().is_none());

        let session = Session::authenticated("tok");
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", Session::authenticated("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_handle_reads_latest_value() {
        let (tx, rx) = watch::channel(Session::unauthenticated());
        let handle = SessionHandle::new(rx);
        assert!(handle.token().is_none());

        tx.send_replace(Session::authenticated("tok"));
        assert_eq!(handle.token(), Some("tok".to_string()));
        assert_eq!(handle.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_wait_until_settled() {
        let (tx, rx) = watch::channel(Session::restoring());
        let handle = SessionHandle::new(rx);

        let waiter = tokio::spawn({
            let handle = handle.clone();
            async move { handle.wait_until_settled().await }
        });

        tokio::task::yield_now().await;
        tx.send_replace(Session::authenticated("tok"));

        let settled = waiter.await.unwrap();
        assert_eq!(settled.token(), Some("tok"));
    }

    #[tokio::test]
    async fn test_wait_until_settled_when_manager_dropped() {
        let (tx, rx) = watch::channel(Session::restoring());
        let handle = SessionHandle::new(rx);
        drop(tx);

        let settled = handle.wait_until_settled().await;
        assert_eq!(settled.status(), SessionStatus::Restoring);
    }
}
