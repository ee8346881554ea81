//! BWC CLI entry point
//!
//! Parses arguments, sets up logging on stderr, runs the command and prints
//! failures with their suggested fix.

use anyhow::Result;
use bwc_cli::cli;
use bwc_cli::core::error::user_friendly_error;
use clap::Parser;

/// Initialise tracing with stderr output, or not at all for `--quiet`.
fn init_tracing(filter: Option<String>) {
    use tracing_subscriber::EnvFilter;

    let Some(filter) = filter else {
        return;
    };
    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    init_tracing(cli.log_filter());

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
