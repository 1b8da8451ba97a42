//! Unified error handling for the Hai client.
//!
//! | Kind | Variant | Retryable | Surfaced as |
//! |------|---------|-----------|-------------|
//! | Unauthenticated | `HaiError::Auth(AuthError::NotAuthenticated)` | No | session reset, back to login |
//! | Transport | `HaiError::Transport(_)` | per `is_retryable()` | swallowed per poll, terminal on submit |
//! | Timeout | `HaiError::Timeout { .. }` | No | terminal question state |
//! | Storage | `HaiError::Storage(_)` | No | "no token" on read, warning on write |
//!
//! # Example
//!
//! ```ignore
//! use hai::error::{HaiError, HaiResult};
//!
//! match backend.submit_question("Hello").await {
//!     Ok(id) => println!("submitted {}", id),
//!     Err(err) if err.requires_reauth() => session.invalidate("401").await,
//!     Err(err) => eprintln!("{} ({})", err.user_message(), err.recovery_hint()),
//! }
//! ```

mod auth;
mod category;
mod hai_error;
mod storage;
mod transport;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use hai_error::HaiError;
pub use storage::StorageError;
pub use transport::{classify_reqwest_error, TransportError};

/// Type alias for Results using HaiError.
pub type HaiResult<T> = Result<T, HaiError>;
