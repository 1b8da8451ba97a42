//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that returns scripted responses
//! or errors and records every request it receives.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::TransportError;
use crate::traits::{Headers, HttpClient, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Fail at the transport layer
    Error(TransportError),
}

impl MockResponse {
    /// 200 response with a JSON body.
    pub fn json(value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_ok(&value))
    }

    /// Response with the given status and body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Success(Response::new(status, body.to_string()))
    }
}

/// Mock HTTP client for testing.
///
/// Responses are resolved per request in this order:
/// 1. the next queued response for the URL (see [`push_response`](Self::push_response)),
/// 2. the sticky response for the URL, exact match first, then prefix match,
/// 3. the default response.
///
/// # Example
///
/// ```ignore
/// use hai::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// let url = "http://api.test/get_answer/q1";
/// client.push_response(url, MockResponse::json(json!({"status": "pending"})));
/// client.set_response(url, MockResponse::json(json!({"status": "answered", "answer": "Hi"})));
///
/// // First GET sees "pending", every later GET sees "answered".
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// One-shot responses by URL, consumed in order
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    /// Sticky responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Simulated latency applied before answering
    latency: Arc<Mutex<Option<Duration>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a sticky response for a URL (exact or prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Queue a one-shot response for an exact URL.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Delay every response by `latency` (uses tokio time, so it honours paused clocks).
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of recorded requests whose URL starts with `prefix`.
    pub fn request_count(&self, prefix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.starts_with(prefix))
            .count()
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(queue) = self.queued.lock().unwrap().get_mut(url) {
            if let Some(response) = queue.pop_front() {
                return Some(response);
            }
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        // Longest matching prefix wins so that more specific patterns override.
        if let Some((_, response)) = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
        {
            return Some(response.clone());
        }

        self.default_response.lock().unwrap().clone()
    }

    async fn respond(&self, url: &str) -> Result<Response, TransportError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(TransportError::Other {
                message: format!("No mock response for URL: {}", url),
            }),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, TransportError> {
        self.record_request("GET", url, headers, None);
        self.respond(url).await
    }

    async fn post(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<Response, TransportError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.respond(url).await
    }
}
