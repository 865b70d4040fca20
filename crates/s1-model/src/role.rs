//! Role domain models
//!
//! Roles are named permission sets scoped to an account. Provisioning only
//! ever looks roles up by name; it never creates or modifies them.

use serde::{Deserialize, Serialize};

/// Name of the predefined administrator role present in every account.
pub const ADMIN_ROLE: &str = "Admin";

/// A role defined within an account scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier
    pub id: String,

    /// Role name (unique within its scope)
    pub name: String,

    /// Name of the owning account
    pub account_name: String,

    /// Scope level the role is defined at
    pub scope: String,

    /// Identifier of the owning scope
    pub scope_id: String,

    /// Whether the platform ships this role
    pub predefined: bool,

    /// Number of users currently holding the role
    pub users_in_role: u64,
}

impl Role {
    /// Check if this is the administrator role.
    pub fn is_admin(&self) -> bool {
        self.name == ADMIN_ROLE
    }
}
