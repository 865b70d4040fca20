//! s1cli - SentinelOne API client
//!
//! Provisions tenant accounts and their first administrator from a CSV batch.
//! Running the same batch twice leaves the platform unchanged.

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod records;

use clap::Parser;
use tracing::{error, warn};

use cli::{Cli, Command};
use config::{AppConfig, LogFormat, LogLevel};
use error::{EXIT_OK, EXIT_USAGE};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { EXIT_USAGE } else { EXIT_OK });
        }
    };

    let config = match AppConfig::load(&cli.global, cli.command.provision_account()) {
        Ok(config) => config,
        Err(err) => {
            logging::init_tracing(LogLevel::default(), LogFormat::default());
            error!(error = %err, "failed to load configuration");
            std::process::exit(err.exit_code());
        }
    };

    // version output goes to stdout only
    if !matches!(cli.command, Command::Version(_)) {
        logging::init_tracing(config.log_level, config.log_format);
        config.log_settings();
    }

    let code = match commands::dispatch(&cli.command, &config).await {
        Ok(()) => EXIT_OK,
        Err(err) => {
            let code = err.exit_code();
            warn!(exit_code = code, "command failed: {}", err);
            code
        }
    };
    std::process::exit(code);
}
