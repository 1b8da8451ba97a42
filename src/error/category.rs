//! Error category classification for unified error handling.
//!
//! Categories drive retry decisions, user messaging and whether the UI
//! layer has to send the user back to the login screen.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, request timeouts. Transient.
    Network,

    /// Missing, rejected or expired session.
    /// Resolved by signing in again.
    Auth,

    /// Backend failures (HTTP 5xx). Transient.
    Server,

    /// Local persistence failures.
    Storage,

    /// An answer did not arrive before its deadline.
    Timeout,

    /// Bad input or a response the client cannot understand.
    User,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::User => "user",
        }
    }

    /// Suggested recovery action for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Auth => "Sign in again to continue",
            ErrorCategory::Server => "The server may be experiencing issues. Please try again later",
            ErrorCategory::Storage => "Check that the session file location is writable",
            ErrorCategory::Timeout => "Try sending your message again",
            ErrorCategory::User => "Check your input and try again",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
