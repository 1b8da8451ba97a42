//! Version command for the Hai CLI.

/// The current version of Hai, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn version_string() -> String {
    format!("hai {}", VERSION)
}
