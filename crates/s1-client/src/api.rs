//! Resource operations used by the reconcilers.
//!
//! [`ProvisioningApi`] is the seam between the reconciliation logic and the
//! REST transport. [`S1Client`] implements it against the management API;
//! the reconcilers only ever see the trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use s1_model::{Account, AccountProvisioningRequest, Role, ScopeRole, User, UserProvisioningRequest};

use crate::error::S1Result;
use crate::transport::S1Client;

/// Remote operations on accounts, roles and users.
///
/// Lookups return `Ok(None)` when nothing matches; a missing resource is
/// never an error at this level.
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    /// Find the account with exactly this name.
    async fn find_account(&self, name: &str) -> S1Result<Option<Account>>;

    /// Create an account expiring at `expiration`.
    async fn create_account(
        &self,
        request: &AccountProvisioningRequest,
        expiration: DateTime<Utc>,
    ) -> S1Result<Account>;

    /// Reactivate an expired account until `expiration`.
    ///
    /// Fails unless the platform confirms the reactivation.
    async fn reactivate_account(&self, account_id: &str, expiration: DateTime<Utc>)
        -> S1Result<()>;

    /// Find the role with exactly this name in the account.
    async fn find_role(&self, account_id: &str, name: &str) -> S1Result<Option<Role>>;

    /// Find the user with exactly this email address.
    async fn find_user(&self, email_address: &str) -> S1Result<Option<User>>;

    /// Create a user holding `request.role` in the account.
    async fn create_user(
        &self,
        request: &UserProvisioningRequest,
        account_id: &str,
        password: &str,
    ) -> S1Result<User>;

    /// Replace the full list of scope roles of a user.
    async fn update_user_scope_roles(
        &self,
        user_id: &str,
        scope_roles: &[ScopeRole],
    ) -> S1Result<User>;

    /// Send a password reset email to the user.
    ///
    /// Fails if the platform reports that no user was affected.
    async fn reset_user_password(&self, user_id: &str) -> S1Result<()>;
}

#[async_trait]
impl ProvisioningApi for S1Client {
    async fn find_account(&self, name: &str) -> S1Result<Option<Account>> {
        S1Client::find_account(self, name).await
    }

    async fn create_account(
        &self,
        request: &AccountProvisioningRequest,
        expiration: DateTime<Utc>,
    ) -> S1Result<Account> {
        S1Client::create_account(self, request, expiration).await
    }

    async fn reactivate_account(
        &self,
        account_id: &str,
        expiration: DateTime<Utc>,
    ) -> S1Result<()> {
        S1Client::reactivate_account(self, account_id, expiration).await
    }

    async fn find_role(&self, account_id: &str, name: &str) -> S1Result<Option<Role>> {
        S1Client::find_role(self, account_id, name).await
    }

    async fn find_user(&self, email_address: &str) -> S1Result<Option<User>> {
        S1Client::find_user(self, email_address).await
    }

    async fn create_user(
        &self,
        request: &UserProvisioningRequest,
        account_id: &str,
        password: &str,
    ) -> S1Result<User> {
        S1Client::create_user(self, request, account_id, password).await
    }

    async fn update_user_scope_roles(
        &self,
        user_id: &str,
        scope_roles: &[ScopeRole],
    ) -> S1Result<User> {
        S1Client::update_user_scope_roles(self, user_id, scope_roles).await
    }

    async fn reset_user_password(&self, user_id: &str) -> S1Result<()> {
        S1Client::reset_user_password(self, user_id).await
    }
}
