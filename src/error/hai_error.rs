//! Unified error type for the Hai client.
//!
//! `HaiError` consolidates the domain error kinds into one enum so that
//! callers can categorize, retry and message errors uniformly. It is `Clone`
//! because failures travel to subscribers inside chat events.

use thiserror::Error;

use super::auth::AuthError;
use super::category::ErrorCategory;
use super::storage::StorageError;
use super::transport::TransportError;

/// Unified error type for the Hai client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HaiError {
    /// Session missing, rejected or malformed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Network or HTTP failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// No answer arrived before the deadline.
    #[error("Question {question_id} was not answered within {after_secs} seconds")]
    Timeout { question_id: String, after_secs: u64 },

    /// Durable token storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl HaiError {
    /// Shorthand for the unauthenticated kind.
    pub fn unauthenticated() -> Self {
        HaiError::Auth(AuthError::NotAuthenticated)
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            HaiError::Auth(err) => {
                if err.requires_reauth() {
                    ErrorCategory::Auth
                } else {
                    ErrorCategory::User
                }
            }
            HaiError::Transport(err) => {
                if err.is_server_side() {
                    ErrorCategory::Server
                } else if matches!(err, TransportError::InvalidResponse { .. }) {
                    ErrorCategory::User
                } else {
                    ErrorCategory::Network
                }
            }
            HaiError::Timeout { .. } => ErrorCategory::Timeout,
            HaiError::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Check if the failed operation may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            HaiError::Transport(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Check if the session must be reset and the user sent back to login.
    pub fn requires_reauth(&self) -> bool {
        match self {
            HaiError::Auth(err) => err.requires_reauth(),
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            HaiError::Auth(err) => err.user_message(),
            HaiError::Transport(err) => err.user_message(),
            HaiError::Timeout { .. } => "Response timed out.".to_string(),
            HaiError::Storage(err) => err.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            HaiError::Auth(err) => err.error_code(),
            HaiError::Transport(err) => err.error_code(),
            HaiError::Timeout { .. } => "E_ANSWER_TIMEOUT",
            HaiError::Storage(err) => err.error_code(),
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl From<reqwest::Error> for HaiError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        HaiError::Transport(super::transport::classify_reqwest_error(&err, &url))
    }
}

impl From<serde_json::Error> for HaiError {
    fn from(err: serde_json::Error) -> Self {
        HaiError::Transport(TransportError::InvalidResponse {
            message: err.to_string(),
        })
    }
}
