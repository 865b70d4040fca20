//! # S1 Client
//!
//! REST transport and idempotent provisioning for SentinelOne management
//! consoles.
//!
//! ## Overview
//!
//! The s1-client crate handles:
//! - **Transport**: Authenticated JSON calls and response envelope decoding
//! - **Codecs**: Wire objects for accounts, users, roles and request bodies
//! - **Account reconciliation**: Create, adopt or reactivate an account by name
//! - **User reconciliation**: Create a user or grant it the account's `Admin` role
//! - **Password reset**: Trigger the platform's reset email for a user
//!
//! ## Architecture
//!
//! ```text
//! Provisioner
//!   ├─ reconcile_account ─┐
//!   └─ reconcile_user ────┴─→ ProvisioningApi ─→ S1Client ─→ /web/api/v2.1
//! ```
//!
//! The reconcilers only see the [`ProvisioningApi`] trait, so the decision
//! logic can be exercised without a console.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use s1_client::{ClientConfig, Provisioner, S1Client};
//! use s1_model::{AccountProvisioningRequest, UserProvisioningRequest};
//!
//! # async fn example() -> s1_client::S1Result<()> {
//! let client = S1Client::new(ClientConfig::new("https://acme.sentinelone.net", "token"))?;
//! let provisioner = Provisioner::new(Arc::new(client)).with_password_reset(true);
//!
//! let account = AccountProvisioningRequest::new("Acme", "8760h").with_bundle("complete", 50);
//! let user = UserProvisioningRequest::new("Jane", "Doe", "jane@acme.test", "Admin");
//! let outcome = provisioner.provision(&account, &user).await?;
//! println!("account {} administered by {}", outcome.account.id, outcome.user.id);
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod api;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod provisioner;
pub mod retry;
pub mod roles;
pub mod transport;
pub mod users;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use accounts::{reconcile_account, resolve_expiration};
pub use api::ProvisioningApi;
pub use config::{ClientConfig, ConfigError, API_BASE_PATH};
pub use envelope::{ApiErrorEntry, Envelope, Pagination};
pub use error::{ErrorKind, S1Error, S1Result};
pub use provisioner::{ProvisioningOutcome, Provisioner};
pub use retry::{with_retry_if, RetryConfig};
pub use roles::resolve_role;
pub use transport::S1Client;
pub use users::{generate_password, reconcile_user};
