//! Authentication module.
//!
//! Connects the opaque identity-provider handshake to the backend login
//! exchange and the session manager.

pub mod flow;

pub use flow::sign_in_with_provider;
