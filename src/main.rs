use color_eyre::Result;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use hai::cli::{parse_args, run_cli_command, run_session_command, Context};
use hai::config::ClientConfig;

/// Log filter variable, e.g. `HAI_LOG=hai=debug`.
const LOG_ENV: &str = "HAI_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let command = parse_args(std::env::args());

    let mut stdout = std::io::stdout();
    if let Some(result) = run_cli_command(&command, &mut stdout) {
        if let Err(e) = result {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
        return Ok(());
    }

    color_eyre::install()?;
    init_tracing();

    let config = ClientConfig::from_env();
    let ctx = Context::from_config(config);
    ctx.session.restore().await;

    let input = BufReader::new(tokio::io::stdin());
    if let Err(e) = run_session_command(command, &ctx, input, &mut stdout).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
