//! # S1 Domain Model
//!
//! This crate provides the tenant domain model used when provisioning
//! accounts and administrative users on a SentinelOne management console.
//!
//! ## Overview
//!
//! The s1-model crate handles:
//! - **Accounts**: Billable tenant organizations and their lifecycle state
//! - **Users**: Administrative principals and their per-account scope roles
//! - **Roles**: Named permission sets scoped to an account (read-only)
//! - **Provisioning requests**: Desired-state descriptions of an account and its first user
//!
//! ## Architecture
//!
//! ```text
//! Account (unique name)
//!   └─ Role (per account, looked up by name)
//!
//! User (unique email)
//!   └─ ScopeRole ─→ (Account id, Role id)
//! ```
//!
//! Values in this crate are plain request/response data. Nothing here talks to
//! the network; see the `s1-client` crate for the reconciliation logic.
//!
//! ## Usage
//!
//! ```rust
//! use s1_model::{AccountProvisioningRequest, UserProvisioningRequest};
//!
//! let account = AccountProvisioningRequest::new("Acme", "8760h")
//!     .with_account_type("Trial")
//!     .with_bundle("complete", 50)
//!     .with_modules(["star", "rso"]);
//! assert_eq!(account.modules.len(), 2);
//!
//! let user = UserProvisioningRequest::new("Jane", "Doe", "jane@acme.test", "Admin");
//! assert_eq!(user.full_name(), "Jane Doe");
//! ```

pub mod account;
pub mod role;
pub mod user;

// Re-export main types for convenience
pub use account::{Account, AccountProvisioningRequest, AccountState};
pub use role::{Role, ADMIN_ROLE};
pub use user::{ScopeRole, User, UserProvisioningRequest, ACCOUNT_SCOPE};
