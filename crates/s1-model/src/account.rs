//! Account domain models
//!
//! This module provides the Account entity and the desired-state request used
//! to provision one. Account names are unique across the platform and act as
//! the natural lookup key; uniqueness is enforced remotely, never locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an account.
///
/// The platform reports state as a free-form string. Only `active` and
/// `expired` carry meaning for provisioning; every other value is kept
/// verbatim in [`AccountState::Other`].
///
/// # Examples
///
/// ```
/// use s1_model::AccountState;
///
/// assert_eq!(AccountState::from("active"), AccountState::Active);
/// assert_eq!(AccountState::from("deleted").as_str(), "deleted");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountState {
    /// Account is in use
    Active,

    /// Account has passed its expiration date
    Expired,

    /// Any other platform-defined state
    Other(String),
}

impl AccountState {
    /// Returns the wire representation of the state.
    pub fn as_str(&self) -> &str {
        match self {
            AccountState::Active => "active",
            AccountState::Expired => "expired",
            AccountState::Other(state) => state,
        }
    }
}

impl From<&str> for AccountState {
    fn from(value: &str) -> Self {
        match value {
            "active" => AccountState::Active,
            "expired" => AccountState::Expired,
            other => AccountState::Other(other.to_string()),
        }
    }
}

impl From<String> for AccountState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => AccountState::Active,
            "expired" => AccountState::Expired,
            _ => AccountState::Other(value),
        }
    }
}

impl From<AccountState> for String {
    fn from(state: AccountState) -> Self {
        match state {
            AccountState::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tenant account on the management platform.
///
/// The identifier is assigned by the server and never changes once the
/// account exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Server-assigned identifier
    pub id: String,

    /// Display name (unique across the platform)
    pub name: String,

    /// Account type tag (e.g. "Trial", "Paid")
    pub account_type: String,

    /// Billing mode tag
    pub billing_mode: String,

    /// When the account expires
    pub expiration: DateTime<Utc>,

    /// Opaque correlation id from an external system
    pub external_id: String,

    /// Lifecycle state
    pub state: AccountState,
}

impl Account {
    /// Check if the account is active.
    pub fn is_active(&self) -> bool {
        self.state == AccountState::Active
    }

    /// Check if the account is expired.
    pub fn is_expired(&self) -> bool {
        self.state == AccountState::Expired
    }
}

/// Desired state of an account.
///
/// `expires` is either a duration relative to the time of provisioning
/// (`"720h"`, `"1h30m"`) or an absolute RFC 3339 timestamp.
///
/// # Examples
///
/// ```
/// use s1_model::AccountProvisioningRequest;
///
/// let request = AccountProvisioningRequest::new("Acme", "2030-01-01T00:00:00Z")
///     .with_external_id("crm-42")
///     .with_reactivation(true);
/// assert!(request.reactivate_account);
/// assert_eq!(request.external_id, "crm-42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProvisioningRequest {
    /// Account name (lookup key)
    pub name: String,

    /// Account type tag
    pub account_type: String,

    /// Relative duration or absolute timestamp
    pub expires: String,

    /// Opaque correlation id from an external system
    pub external_id: String,

    /// Reactivate the account if it exists but has expired
    #[serde(default)]
    pub reactivate_account: bool,

    /// License bundle name
    pub bundle: String,

    /// Number of agents licensed under the bundle
    #[serde(default)]
    pub total_agents: u32,

    /// Enabled add-on module names
    #[serde(default)]
    pub modules: Vec<String>,
}

impl AccountProvisioningRequest {
    /// Creates a request for the named account expiring at `expires`.
    pub fn new(name: impl Into<String>, expires: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expires: expires.into(),
            ..Self::default()
        }
    }

    /// Set the account type tag.
    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    /// Set the external correlation id.
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = external_id.into();
        self
    }

    /// Set the license bundle and the number of agents it covers.
    pub fn with_bundle(mut self, bundle: impl Into<String>, total_agents: u32) -> Self {
        self.bundle = bundle.into();
        self.total_agents = total_agents;
        self
    }

    /// Set the enabled module names.
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    /// Allow an expired account to be reactivated.
    pub fn with_reactivation(mut self, reactivate: bool) -> Self {
        self.reactivate_account = reactivate;
        self
    }
}
