//! Command implementations.

pub mod provision;
pub mod version;

use crate::cli::{Command, ProvisionCommand};
use crate::config::AppConfig;
use crate::error::CliResult;

/// Run the selected command.
pub async fn dispatch(command: &Command, config: &AppConfig) -> CliResult<()> {
    match command {
        Command::Provision {
            target: ProvisionCommand::Account(_),
        } => provision::run(config).await,
        Command::Version(args) => {
            version::run(args);
            Ok(())
        }
    }
}
