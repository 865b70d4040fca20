//! Command-line arguments.
//!
//! Every option can also be set through an environment variable named after
//! its configuration key (`S1CLI_GLOBAL_*`, `S1CLI_COMMAND_PROVISION_ACCOUNT_*`)
//! or in the configuration file. Values left unset here fall through to the
//! file and then to built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// SentinelOne API client
#[derive(Parser, Debug)]
#[command(name = "s1cli", about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// SentinelOne API key
    #[arg(
        short = 'k',
        long,
        env = "S1CLI_GLOBAL_API_KEY",
        hide_env_values = true,
        global = true
    )]
    pub api_key: Option<String>,

    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short = 'f', long, env = "S1CLI_GLOBAL_CONFIG_FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Logging level: trace, debug, info, warn or error
    #[arg(short = 'l', long, env = "S1CLI_GLOBAL_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log output format: text or json
    #[arg(long, env = "S1CLI_GLOBAL_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// SentinelOne tenant URL
    #[arg(short = 't', long, env = "S1CLI_GLOBAL_TENANT_URL", global = true)]
    pub tenant_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "S1CLI_GLOBAL_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Extra attempts for failed lookups
    #[arg(long, env = "S1CLI_GLOBAL_MAX_RETRIES", global = true)]
    pub max_retries: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Provision resources on the platform
    Provision {
        #[command(subcommand)]
        target: ProvisionCommand,
    },

    /// Display application version information
    Version(VersionArgs),
}

#[derive(Subcommand, Debug)]
pub enum ProvisionCommand {
    /// Provision accounts and their first administrator
    Account(ProvisionAccountArgs),
}

/// Options for `provision account`.
#[derive(Args, Debug, Clone, Default)]
pub struct ProvisionAccountArgs {
    /// Provision accounts from the given CSV file
    #[arg(long, env = "S1CLI_COMMAND_PROVISION_ACCOUNT_CSV_SOURCE")]
    pub csv_source: Option<PathBuf>,

    /// Field separator of the CSV file
    #[arg(long, env = "S1CLI_COMMAND_PROVISION_ACCOUNT_CSV_SEPARATOR")]
    pub csv_separator: Option<String>,

    /// If an account exists and is expired, reactivate it
    #[arg(
        long,
        env = "S1CLI_COMMAND_PROVISION_ACCOUNT_REACTIVATE_EXPIRED_ACCOUNT",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub reactivate_expired_account: Option<bool>,

    /// Send the first user a password reset email
    #[arg(
        long,
        env = "S1CLI_COMMAND_PROVISION_ACCOUNT_RESET_FIRST_USER_PASSWORD",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub reset_first_user_password: Option<bool>,
}

/// Options for `version`.
#[derive(Args, Debug, Clone, Default)]
pub struct VersionArgs {
    /// Only show the version number
    #[arg(long, conflicts_with = "verbose")]
    pub short: bool,

    /// Show detailed build information
    #[arg(long)]
    pub verbose: bool,
}

impl Command {
    /// Options of `provision account`, if that is the command being run.
    pub fn provision_account(&self) -> Option<&ProvisionAccountArgs> {
        match self {
            Command::Provision {
                target: ProvisionCommand::Account(args),
            } => Some(args),
            Command::Version(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_provision_account() {
        let cli = Cli::try_parse_from([
            "s1cli",
            "-t",
            "https://acme.sentinelone.net",
            "provision",
            "account",
            "--csv-source",
            "accounts.csv",
            "--reactivate-expired-account",
            "-k",
            "secret",
        ])
        .unwrap();

        assert_eq!(cli.global.tenant_url.as_deref(), Some("https://acme.sentinelone.net"));
        assert_eq!(cli.global.api_key.as_deref(), Some("secret"));

        let args = cli.command.provision_account().unwrap();
        assert_eq!(args.csv_source, Some(PathBuf::from("accounts.csv")));
        assert_eq!(args.reactivate_expired_account, Some(true));
        assert_eq!(args.reset_first_user_password, None);
    }

    #[test]
    fn test_explicit_boolean_value() {
        let cli = Cli::try_parse_from([
            "s1cli",
            "provision",
            "account",
            "--reset-first-user-password",
            "false",
        ])
        .unwrap();

        let args = cli.command.provision_account().unwrap();
        assert_eq!(args.reset_first_user_password, Some(false));
    }

    #[test]
    fn test_version_flags_conflict() {
        assert!(Cli::try_parse_from(["s1cli", "version", "--short", "--verbose"]).is_err());

        let cli = Cli::try_parse_from(["s1cli", "version", "--short"]).unwrap();
        assert!(cli.command.provision_account().is_none());
    }

    #[test]
    fn test_missing_command_is_usage_error() {
        assert!(Cli::try_parse_from(["s1cli"]).is_err());
    }
}
