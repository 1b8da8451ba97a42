//! Command-line argument parsing for the Hai CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Exchange an identity-provider ID token for a session.
    /// `None` means read it from `HAI_ID_TOKEN`.
    Login { id_token: Option<String> },
    /// End the session
    Logout,
    /// Show session status
    Status,
    /// Ask one question and wait for its answer
    Ask { text: String },
    /// Interactive chat over stdin (default)
    Chat,
    /// Arguments could not be understood
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: hai [COMMAND]

Commands:
  login [ID_TOKEN]   Sign in with an identity-provider ID token (or HAI_ID_TOKEN)
  logout             Sign out and forget the saved session
  status             Show whether a session is active
  ask <TEXT>...      Ask a single question and print the answer
  chat               Chat interactively, one question per line (default)

Options:
  -h, --help         Show this message
  -V, --version      Show version";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use hai::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["hai".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Chat;
    };

    match command.as_str() {
        "login" => match rest {
            [] => CliCommand::Login { id_token: None },
            [token] => CliCommand::Login {
                id_token: Some(token.clone()),
            },
            _ => CliCommand::Invalid("login takes at most one ID token".to_string()),
        },
        "logout" => CliCommand::Logout,
        "status" => CliCommand::Status,
        "ask" => {
            let text = rest.join(" ");
            if text.trim().is_empty() {
                CliCommand::Invalid("ask needs the question text".to_string())
            } else {
                CliCommand::Ask { text }
            }
        }
        "chat" => CliCommand::Chat,
        other => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}
