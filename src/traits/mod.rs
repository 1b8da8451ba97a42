//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST)
//! - [`TokenStore`] - Durable session token persistence
//! - [`IdentityProvider`] - Third-party identity credential source
//! - [`QuestionApi`] - Question submission and answer polling

pub mod http;
pub mod identity;
pub mod question_api;
pub mod token_store;

pub use http::{Headers, HttpClient, Response};
pub use identity::{IdentityProvider, StaticIdentity};
pub use question_api::QuestionApi;
pub use token_store::TokenStore;
