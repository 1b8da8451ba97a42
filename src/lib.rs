//! Hai client core.
//!
//! Session lifecycle and submit-then-poll chat orchestration for the Hai
//! assistant backend. The `hai` binary is a thin CLI over these modules.

pub mod adapters;
pub mod auth;
pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod traits;
