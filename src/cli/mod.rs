//! CLI module for Hai.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version and usage display
//! - Session commands (login, logout, status)
//! - Chat commands (ask, chat)
//!
//! # Usage
//!
//! ```ignore
//! use hai::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command, &mut std::io::stdout()) {
//!     // Handled without touching the session
//!     return result;
//! }
//! // Build a Context, restore the session, then run_session_command
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use commands::{run_session_command, Context, GREETING};
pub use version::{version_string, VERSION};

use std::io::Write;

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a command that does not need the session.
///
/// # Returns
///
/// * `None` - the command needs a session; use [`run_session_command`]
/// * `Some(Ok(()))` - the command ran
/// * `Some(Err(e))` - the arguments were invalid
pub fn run_cli_command<W: Write>(command: &CliCommand, out: &mut W) -> Option<Result<()>> {
    match command {
        CliCommand::Version => Some(writeln!(out, "{}", version_string()).map_err(Into::into)),
        CliCommand::Help => Some(writeln!(out, "{}", USAGE).map_err(Into::into)),
        CliCommand::Invalid(message) => Some(Err(eyre!("{}\n\n{}", message, USAGE))),
        _ => None,
    }
}
