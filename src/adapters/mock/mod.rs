//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with scripted responses
//! - [`InMemoryTokenStore`] - In-memory token storage with failure injection

pub mod http;
pub mod token_store;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use token_store::InMemoryTokenStore;
