//! Transport-level error types.
//!
//! Everything that can go wrong between the client and the backend once a
//! request is actually sent: connection failures, timeouts, non-2xx
//! statuses and bodies that do not parse.

use thiserror::Error;

/// Transport failure with a retryability hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection to the server failed.
    #[error("Connection failed to '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out at the HTTP layer.
    #[error("{operation} timed out")]
    Timeout { operation: String },

    /// Non-2xx response other than 401.
    #[error("HTTP {status} error: {message}")]
    HttpStatus { status: u16, message: String },

    /// The body could not be understood.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Request was cancelled before completing.
    #[error("Request cancelled")]
    Cancelled,

    /// Anything else reqwest reports.
    #[error("Network error: {message}")]
    Other { message: String },
}

impl TransportError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed { .. } => true,
            TransportError::Timeout { .. } => true,
            TransportError::HttpStatus { status, .. } => {
                *status >= 500 || *status == 429 || *status == 408
            }
            TransportError::InvalidResponse { .. } => false,
            TransportError::Cancelled => false,
            // Unclassified reqwest failures are usually mid-flight resets.
            TransportError::Other { .. } => true,
        }
    }

    /// True for 5xx responses.
    pub fn is_server_side(&self) -> bool {
        matches!(self, TransportError::HttpStatus { status, .. } if *status >= 500)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            TransportError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check your internet connection."
                    .to_string()
            }
            TransportError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            TransportError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid. Please try again.".to_string(),
                403 => "Access denied. You don't have permission for this action.".to_string(),
                404 => "The requested resource was not found.".to_string(),
                429 => "Too many requests. Please wait a moment and try again.".to_string(),
                500..=599 => {
                    "The server is experiencing issues. Please try again later.".to_string()
                }
                _ => format!(
                    "The server returned an error (HTTP {}). Please try again.",
                    status
                ),
            },
            TransportError::InvalidResponse { .. } => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            TransportError::Cancelled => "The request was cancelled.".to_string(),
            TransportError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            TransportError::ConnectionFailed { .. } => "E_NET_CONN",
            TransportError::Timeout { .. } => "E_NET_TIMEOUT",
            TransportError::HttpStatus { .. } => "E_NET_HTTP",
            TransportError::InvalidResponse { .. } => "E_NET_INVALID",
            TransportError::Cancelled => "E_NET_CANCEL",
            TransportError::Other { .. } => "E_NET_OTHER",
        }
    }
}

/// Classify a reqwest error into a TransportError.
pub fn classify_reqwest_error(err: &reqwest::Error, url: &str) -> TransportError {
    if err.is_connect() {
        TransportError::ConnectionFailed {
            url: url.to_string(),
            message: err.to_string(),
        }
    } else if err.is_timeout() {
        TransportError::Timeout {
            operation: format!("Request to '{}'", url),
        }
    } else if err.is_status() {
        TransportError::HttpStatus {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::InvalidResponse {
            message: format!("Failed to decode response: {}", err),
        }
    } else if err.is_builder() {
        TransportError::ConnectionFailed {
            url: url.to_string(),
            message: format!("Invalid request: {}", err),
        }
    } else {
        TransportError::Other {
            message: err.to_string(),
        }
    }
}
