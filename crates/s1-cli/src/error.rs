//! Command errors and process exit codes.

use std::path::PathBuf;

use s1_client::S1Error;
use thiserror::Error;

use crate::config::ConfigError;

/// Successful run.
pub const EXIT_OK: i32 = 0;
/// Invalid command line.
pub const EXIT_USAGE: i32 = 1;
/// Failure outside the configuration and the remote calls.
pub const EXIT_GENERAL: i32 = 2;
/// The configuration file could not be read.
pub const EXIT_CONFIG_LOAD: i32 = 21;
/// The configuration file is not valid TOML.
pub const EXIT_CONFIG_PARSE: i32 = 22;
/// A configuration value is invalid.
pub const EXIT_CONFIG_VALIDATE: i32 = 23;
/// Provisioning failed while interpreting a response or the remote state.
pub const EXIT_CLIENT: i32 = 101;
/// Provisioning failed while issuing a request.
pub const EXIT_REQUEST: i32 = 102;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or validated
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The record source could not be opened or decoded
    #[error("failed to read records from '{}': {message}", .path.display())]
    RecordSource {
        /// Record file
        path: PathBuf,
        /// Cause
        message: String,
    },

    /// A provisioning step failed
    #[error(transparent)]
    Provisioning(#[from] S1Error),
}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn record_source(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CliError::RecordSource {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(err) => err.exit_code(),
            CliError::RecordSource { .. } => EXIT_GENERAL,
            CliError::Provisioning(err) if err.is_request_error() => EXIT_REQUEST,
            CliError::Provisioning(_) => EXIT_CLIENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provisioning_exit_codes() {
        let request = CliError::from(S1Error::ServerError {
            method: "GET".to_string(),
            url: "https://console.test/web/api/v2.1/accounts".to_string(),
            status: 503,
        });
        assert_eq!(request.exit_code(), EXIT_REQUEST);

        let api = CliError::from(S1Error::ApiReported {
            method: "POST".to_string(),
            url: "https://console.test/web/api/v2.1/users".to_string(),
            count: 1,
        });
        assert_eq!(api.exit_code(), EXIT_REQUEST);

        let state = CliError::from(S1Error::AccountExpired {
            name: "Acme".to_string(),
        });
        assert_eq!(state.exit_code(), EXIT_CLIENT);

        let invalid = CliError::from(S1Error::InvalidExpiration {
            value: "soon".to_string(),
        });
        assert_eq!(invalid.exit_code(), EXIT_CLIENT);
    }

    #[test]
    fn test_record_source_exit_code() {
        let err = CliError::record_source("accounts.csv", "unexpected end of record");
        assert_eq!(err.exit_code(), EXIT_GENERAL);
        assert!(err.to_string().contains("accounts.csv"));
    }
}
