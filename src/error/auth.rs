//! Authentication-related error types.

use thiserror::Error;

/// Authentication-specific error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No session token, or the backend rejected the one we sent (HTTP 401).
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A token handed to sign-in was empty.
    #[error("Invalid session token: {message}")]
    InvalidToken { message: String },

    /// The backend login exchange refused the provider credential.
    #[error("Login rejected ({status}): {message}")]
    LoginRejected { status: u16, message: String },

    /// The identity provider did not produce a credential.
    #[error("Identity provider unavailable: {message}")]
    IdentityUnavailable { message: String },
}

impl AuthError {
    /// Check if this error is resolved by signing in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, AuthError::NotAuthenticated)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::NotAuthenticated => {
                "You are not signed in. Please sign in to continue.".to_string()
            }
            AuthError::InvalidToken { .. } => {
                "The sign-in response was invalid. Please try again.".to_string()
            }
            AuthError::LoginRejected { .. } => "Backend authentication failed.".to_string(),
            AuthError::IdentityUnavailable { message } => format!("Login failed: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated => "E_AUTH_NOT_AUTH",
            AuthError::InvalidToken { .. } => "E_AUTH_INVALID",
            AuthError::LoginRejected { .. } => "E_AUTH_LOGIN",
            AuthError::IdentityUnavailable { .. } => "E_AUTH_IDP",
        }
    }
}
