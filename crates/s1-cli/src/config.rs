//! Application configuration.
//!
//! Settings are layered, highest precedence first:
//!
//! ```text
//! command-line flag → environment variable → config.toml → default
//! ```
//!
//! Flags and environment variables are resolved together by clap into a
//! [`ConfigLayer`]; the TOML file produces a second layer; the two are merged
//! and finalized into an [`AppConfig`] that is built once and passed by
//! reference to the command being run.
//!
//! ```toml
//! [global]
//! api_key = "..."
//! tenant_url = "https://usea1-acme.sentinelone.net"
//! log_level = "info"
//! log_format = "text"
//!
//! [command.provision.account]
//! csv_source = "accounts.csv"
//! csv_separator = ","
//! reactivate_expired_account = false
//! reset_first_user_password = true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use s1_client::ClientConfig;

use crate::cli::{GlobalArgs, ProvisionAccountArgs};
use crate::error::{EXIT_CONFIG_LOAD, EXIT_CONFIG_PARSE, EXIT_CONFIG_VALIDATE};

/// Configuration file used when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Default CSV field separator.
pub const DEFAULT_CSV_SEPARATOR: char = ',';

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to load configuration file '{}': {source}", .path.display())]
    Load {
        /// Configuration file
        path: PathBuf,
        /// I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("failed to parse configuration file '{}': {source}", .path.display())]
    Parse {
        /// Configuration file
        path: PathBuf,
        /// TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid value '{value}' for option '{key}': {message}")]
    Validate {
        /// Option name
        key: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: &str, value: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validate {
            key: key.to_string(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Load { .. } => EXIT_CONFIG_LOAD,
            ConfigError::Parse { .. } => EXIT_CONFIG_PARSE,
            ConfigError::Validate { .. } => EXIT_CONFIG_VALIDATE,
        }
    }
}

/// Minimum level of log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::invalid(
                "log_level",
                value,
                "expected one of trace, debug, info, warn or error",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::invalid(
                "log_format",
                value,
                "expected text or json",
            )),
        }
    }
}

/// One source of settings; unset values fall through to lower layers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub global: GlobalLayer,
    pub command: CommandLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlobalLayer {
    pub api_key: Option<String>,
    pub tenant_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommandLayer {
    pub provision: ProvisionLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvisionLayer {
    pub account: ProvisionAccountLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProvisionAccountLayer {
    pub csv_source: Option<PathBuf>,
    pub csv_separator: Option<String>,
    pub reactivate_expired_account: Option<bool>,
    pub reset_first_user_password: Option<bool>,
}

impl ConfigLayer {
    /// Build the layer given on the command line and in the environment.
    pub fn from_args(global: &GlobalArgs, provision_account: Option<&ProvisionAccountArgs>) -> Self {
        let account = provision_account.cloned().unwrap_or_default();
        Self {
            global: GlobalLayer {
                api_key: global.api_key.clone(),
                tenant_url: global.tenant_url.clone(),
                log_level: global.log_level.clone(),
                log_format: global.log_format.clone(),
                timeout_secs: global.timeout_secs,
                max_retries: global.max_retries,
            },
            command: CommandLayer {
                provision: ProvisionLayer {
                    account: ProvisionAccountLayer {
                        csv_source: account.csv_source,
                        csv_separator: account.csv_separator,
                        reactivate_expired_account: account.reactivate_expired_account,
                        reset_first_user_password: account.reset_first_user_password,
                    },
                },
            },
        }
    }

    /// Read a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(path, &content)
    }

    fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay `higher` on top of this layer.
    pub fn merge(self, higher: ConfigLayer) -> ConfigLayer {
        let (low, high) = (self.global, higher.global);
        let (low_acct, high_acct) = (self.command.provision.account, higher.command.provision.account);
        ConfigLayer {
            global: GlobalLayer {
                api_key: high.api_key.or(low.api_key),
                tenant_url: high.tenant_url.or(low.tenant_url),
                log_level: high.log_level.or(low.log_level),
                log_format: high.log_format.or(low.log_format),
                timeout_secs: high.timeout_secs.or(low.timeout_secs),
                max_retries: high.max_retries.or(low.max_retries),
            },
            command: CommandLayer {
                provision: ProvisionLayer {
                    account: ProvisionAccountLayer {
                        csv_source: high_acct.csv_source.or(low_acct.csv_source),
                        csv_separator: high_acct.csv_separator.or(low_acct.csv_separator),
                        reactivate_expired_account: high_acct
                            .reactivate_expired_account
                            .or(low_acct.reactivate_expired_account),
                        reset_first_user_password: high_acct
                            .reset_first_user_password
                            .or(low_acct.reset_first_user_password),
                    },
                },
            },
        }
    }
}

/// Options of `provision account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionAccountOptions {
    /// CSV file with one record per account; `None` means no batch source
    pub csv_source: Option<PathBuf>,
    /// CSV field separator
    pub csv_separator: u8,
    /// Reactivate accounts found expired
    pub reactivate_expired_account: bool,
    /// Send a password reset email to each provisioned user
    pub reset_first_user_password: bool,
}

impl Default for ProvisionAccountOptions {
    fn default() -> Self {
        Self {
            csv_source: None,
            csv_separator: DEFAULT_CSV_SEPARATOR as u8,
            reactivate_expired_account: false,
            reset_first_user_password: false,
        }
    }
}

/// Effective application settings.
#[derive(Clone)]
pub struct AppConfig {
    /// File the settings were read from, if any
    pub config_file: Option<PathBuf>,
    pub api_key: String,
    pub tenant_url: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub timeout_secs: Option<u64>,
    pub max_retries: u32,
    pub provision_account: ProvisionAccountOptions,

    /// Problems corrected while loading, reported once logging is up
    warnings: Vec<String>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("config_file", &self.config_file)
            .field("api_key", &"[REDACTED]")
            .field("tenant_url", &self.tenant_url)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("provision_account", &self.provision_account)
            .finish()
    }
}

impl AppConfig {
    /// Load settings from the command line, the environment and the
    /// configuration file.
    ///
    /// A file named with `--config-file` must exist; the default
    /// `./config.toml` is read only when present.
    pub fn load(
        global: &GlobalArgs,
        provision_account: Option<&ProvisionAccountArgs>,
    ) -> Result<Self, ConfigError> {
        let config_file = match &global.config_file {
            Some(path) => Some(path.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            }
        };

        let file_layer = match &config_file {
            Some(path) => ConfigLayer::from_file(path)?,
            None => ConfigLayer::default(),
        };
        let layer = file_layer.merge(ConfigLayer::from_args(global, provision_account));

        Self::from_layer(layer, config_file)
    }

    /// Apply defaults and validate a merged layer.
    pub fn from_layer(layer: ConfigLayer, config_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let global = layer.global;
        let mut warnings = Vec::new();

        let log_level = match global.log_level.as_deref() {
            Some(value) => LogLevel::parse(value)?,
            None => LogLevel::default(),
        };
        let log_format = match global.log_format.as_deref() {
            Some(value) => LogFormat::parse(value)?,
            None => LogFormat::default(),
        };

        let account = layer.command.provision.account;
        let csv_source = account.csv_source.filter(|path| !path.as_os_str().is_empty());
        let mut provision_account = ProvisionAccountOptions {
            csv_source,
            reactivate_expired_account: account.reactivate_expired_account.unwrap_or(false),
            reset_first_user_password: account.reset_first_user_password.unwrap_or(false),
            ..ProvisionAccountOptions::default()
        };

        if let Some(source) = &provision_account.csv_source {
            let separator = account
                .csv_separator
                .unwrap_or_else(|| DEFAULT_CSV_SEPARATOR.to_string());
            provision_account.csv_separator = match separator.as_bytes() {
                [] => {
                    warnings.push(format!(
                        "an empty CSV separator is not allowed; defaulting to '{}'",
                        DEFAULT_CSV_SEPARATOR
                    ));
                    DEFAULT_CSV_SEPARATOR as u8
                }
                [byte] => *byte,
                _ => {
                    return Err(ConfigError::invalid(
                        "csv_separator",
                        separator.clone(),
                        "CSV separator must be a single character",
                    ))
                }
            };

            if !source.is_file() {
                return Err(ConfigError::invalid(
                    "csv_source",
                    source.display().to_string(),
                    "file does not exist",
                ));
            }
        }

        Ok(Self {
            config_file,
            api_key: global.api_key.unwrap_or_default(),
            tenant_url: global.tenant_url.unwrap_or_default(),
            log_level,
            log_format,
            timeout_secs: global.timeout_secs,
            max_retries: global.max_retries.unwrap_or(0),
            provision_account,
            warnings,
        })
    }

    /// Log the effective settings and any corrections made while loading.
    pub fn log_settings(&self) {
        for message in &self.warnings {
            warn!("{}", message);
        }
        debug!(config = ?self, "loaded configuration");
    }

    /// Client settings for the configured console.
    ///
    /// Fails unless both the API key and the tenant URL are usable.
    pub fn client_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::new(self.tenant_url.clone(), self.api_key.clone())
            .with_max_retries(self.max_retries);
        config.timeout_secs = self.timeout_secs;

        config.validate().map_err(|err| match err {
            s1_client::ConfigError::MissingValue(key) => {
                ConfigError::invalid(&key, "", "a value is required")
            }
            s1_client::ConfigError::InvalidValue { key, message } => {
                let value = if key == "tenant_url" {
                    self.tenant_url.clone()
                } else {
                    String::new()
                };
                ConfigError::invalid(&key, value, message)
            }
        })?;
        Ok(config)
    }
}
