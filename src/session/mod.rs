//! Session state and lifecycle.
//!
//! [`SessionManager`] owns the token and its persistence. Everything else
//! reads it through a [`SessionHandle`].

pub mod manager;
pub mod state;

pub use manager::SessionManager;
pub use state::{Session, SessionHandle, SessionStatus};
