//! Common test utilities for integration tests.
//!
//! Fixtures for building a session, a backend client and an orchestrator
//! over either the scripted mock transport or a wiremock server.
//!
//! # Example
//!
//! ```ignore
//! let store = InMemoryTokenStore::with_token(TEST_TOKEN);
//! let session = restored_session(&store).await;
//! let backend = mock_backend(&session, MockHttpConfig::new().build());
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use std::sync::Arc;
use std::time::Duration;

use hai::adapters::ReqwestHttpClient;
use hai::backend::BackendClient;
use hai::chat::{ChatEvent, ChatOrchestrator, PollPolicy};
use hai::session::SessionManager;
use hai::traits::TokenStore;
use tokio::sync::mpsc;

/// Base URL used with the mock transport.
pub const MOCK_BASE: &str = "http://hai.test";

/// Session token handed out by the fake login exchange.
pub const TEST_TOKEN: &str = "test-session-token-12345";

/// Create a session manager over `store` and restore it.
pub async fn restored_session<S: TokenStore + Clone + 'static>(store: &S) -> SessionManager {
    let session = SessionManager::new(Arc::new(store.clone()));
    session.restore().await;
    session
}

/// Backend client over the scripted mock transport.
pub fn mock_backend(session: &SessionManager, http: MockHttpClient) -> Arc<BackendClient<MockHttpClient>> {
    Arc::new(BackendClient::new(MOCK_BASE, http, session.handle()))
}

/// Backend client over a real socket, e.g. a wiremock server.
pub fn http_backend(session: &SessionManager, base_url: &str) -> Arc<BackendClient<ReqwestHttpClient>> {
    Arc::new(BackendClient::new(
        base_url,
        ReqwestHttpClient::with_timeout(Duration::from_secs(5)),
        session.handle(),
    ))
}

/// Orchestrator with the default 2s / 120s policy.
pub fn orchestrator<C>(
    backend: &Arc<BackendClient<C>>,
) -> (ChatOrchestrator, mpsc::UnboundedReceiver<ChatEvent>)
where
    C: hai::traits::HttpClient + 'static,
{
    ChatOrchestrator::new(backend.clone(), PollPolicy::default())
}

/// Receive events until one is terminal, returning everything received.
pub async fn collect_until_terminal(rx: &mut mpsc::UnboundedReceiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let terminal = event.is_terminal();
        events.push(event);
        if terminal {
            break;
        }
    }
    events
}
