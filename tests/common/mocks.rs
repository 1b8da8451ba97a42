//! Mock configurations for test fixtures.
//!
//! Re-exports the mock implementations from `hai::adapters::mock` and adds a
//! builder that scripts the Hai endpoints.

pub use hai::adapters::mock::{InMemoryTokenStore, MockHttpClient, MockResponse};
pub use hai::error::TransportError;

use serde_json::json;

use super::MOCK_BASE;

/// Builder for a [`MockHttpClient`] that speaks the Hai API.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// `POST /ask` returns `question_id` (once per call, in order).
    pub fn with_submit(self, question_id: &str) -> Self {
        self.client.push_response(
            &format!("{}/ask", MOCK_BASE),
            MockResponse::json(json!({ "question_id": question_id })),
        );
        self
    }

    /// `POST /ask` fails at the transport layer.
    pub fn with_submit_error(self, error: TransportError) -> Self {
        self.client
            .set_response(&format!("{}/ask", MOCK_BASE), MockResponse::Error(error));
        self
    }

    /// Queue one `pending` answer for `question_id`.
    pub fn with_pending(self, question_id: &str) -> Self {
        self.client.push_response(
            &answer_url(question_id),
            MockResponse::json(json!({ "status": "pending" })),
        );
        self
    }

    /// Once the queue is drained, every poll for `question_id` answers `text`.
    pub fn with_answer(self, question_id: &str, text: &str) -> Self {
        self.client.set_response(
            &answer_url(question_id),
            MockResponse::json(json!({ "status": "answered", "answer": text })),
        );
        self
    }

    /// Every poll for `question_id` stays pending.
    pub fn always_pending(self, question_id: &str) -> Self {
        self.client.set_response(
            &answer_url(question_id),
            MockResponse::json(json!({ "status": "pending" })),
        );
        self
    }

    /// Every poll for `question_id` returns `status` with `body`.
    pub fn with_answer_status(self, question_id: &str, status: u16, body: &str) -> Self {
        self.client
            .set_response(&answer_url(question_id), MockResponse::status(status, body));
        self
    }

    /// `POST /auth/google` returns `access_token`.
    pub fn with_login(self, access_token: &str) -> Self {
        self.client.set_response(
            &format!("{}/auth/google", MOCK_BASE),
            MockResponse::json(json!({ "access_token": access_token })),
        );
        self
    }

    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Poll URL for a question on the mock base.
pub fn answer_url(question_id: &str) -> String {
    format!("{}/get_answer/{}", MOCK_BASE, question_id)
}
