//! User domain models
//!
//! This module provides the administrative user entity and its scope roles.
//! A scope role binds a user to one account with one role; a user that
//! administers several accounts carries one entry per account.

use serde::{Deserialize, Serialize};

/// Scope value for users whose roles are granted per account.
pub const ACCOUNT_SCOPE: &str = "account";

/// A role granted to a user within one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeRole {
    /// Identifier of the scope (account) the role applies to
    pub scope_id: String,

    /// Role identifier
    pub role_id: String,

    /// Role name
    pub role_name: String,
}

impl ScopeRole {
    /// Creates a new scope role binding.
    pub fn new(
        scope_id: impl Into<String>,
        role_id: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            role_id: role_id.into(),
            role_name: role_name.into(),
        }
    }
}

/// An administrative user of the management platform.
///
/// Email addresses are unique across the platform and serve as the lookup key.
///
/// # Examples
///
/// ```
/// use s1_model::{ScopeRole, User};
///
/// let user = User {
///     id: "u-1".to_string(),
///     email_address: "jane@acme.test".to_string(),
///     email_verified: true,
///     two_factor_status: "configured".to_string(),
///     scope: "account".to_string(),
///     scope_roles: vec![ScopeRole::new("1001", "r-1", "Admin")],
/// };
/// assert!(user.has_scope("1001"));
/// assert!(!user.has_scope("2002"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier
    pub id: String,

    /// Email address (unique)
    pub email_address: String,

    /// Whether the email address has been verified
    pub email_verified: bool,

    /// Two-factor authentication status
    pub two_factor_status: String,

    /// Scope level of the user (`account` or broader)
    pub scope: String,

    /// Roles held by the user; order carries no meaning
    #[serde(default)]
    pub scope_roles: Vec<ScopeRole>,
}

impl User {
    /// Returns the role the user holds in the given scope, if any.
    pub fn scope_role(&self, scope_id: &str) -> Option<&ScopeRole> {
        self.scope_roles.iter().find(|role| role.scope_id == scope_id)
    }

    /// Check if the user holds any role in the given scope.
    pub fn has_scope(&self, scope_id: &str) -> bool {
        self.scope_role(scope_id).is_some()
    }
}

/// Desired state of an administrative user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProvisioningRequest {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address (lookup key)
    pub email_address: String,

    /// Name of the role to grant a newly created user
    pub role: String,
}

impl UserProvisioningRequest {
    /// Creates a new user request.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email_address: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email_address: email_address.into(),
            role: role.into(),
        }
    }

    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
