//! Ghar CLI

use std::process::ExitCode;

use tracing::error;

use crate::config::CliConfig;

mod commands;
mod config;
mod logging;

/// Ghar CLI entry point
#[tokio::main]
pub async fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(parse_error) => parse_error.exit(),
    };

    if let Err(init_error) = logging::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        return ExitCode::FAILURE;
    }

    match commands::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!("{run_error:#}");

            #[expect(
                clippy::print_stderr,
                reason = "command failures are reported to the user on stderr"
            )]
            {
                eprintln!("Error: {run_error:#}");
            }

            ExitCode::FAILURE
        }
    }
}
