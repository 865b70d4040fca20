//! End-to-end provisioning of one account and its first administrator.

use std::sync::Arc;

use tracing::{info, instrument};

use s1_model::{Account, AccountProvisioningRequest, User, UserProvisioningRequest};

use crate::accounts::reconcile_account;
use crate::api::ProvisioningApi;
use crate::error::S1Result;
use crate::users::reconcile_user;

/// Result of provisioning one record.
#[derive(Debug, Clone)]
pub struct ProvisioningOutcome {
    /// The created, adopted or reactivated account
    pub account: Account,
    /// The user administering the account
    pub user: User,
    /// Whether a password reset email was triggered for the user
    pub password_reset_sent: bool,
}

/// Runs account and user reconciliation in order.
///
/// Records are independent; nothing is shared between calls to
/// [`Provisioner::provision`] apart from the API handle.
#[derive(Clone)]
pub struct Provisioner {
    api: Arc<dyn ProvisioningApi>,
    reset_password: bool,
}

impl Provisioner {
    /// Create a provisioner that does not reset passwords.
    pub fn new(api: Arc<dyn ProvisioningApi>) -> Self {
        Self {
            api,
            reset_password: false,
        }
    }

    /// Trigger a password reset for the user after reconciliation.
    pub fn with_password_reset(mut self, reset_password: bool) -> Self {
        self.reset_password = reset_password;
        self
    }

    /// Reconcile the account, then its administrator.
    ///
    /// Stops at the first failure; an account created before a user failure
    /// stays in place and is adopted on the next run.
    #[instrument(
        skip(self, account, user),
        fields(account_name = %account.name, email_address = %user.email_address)
    )]
    pub async fn provision(
        &self,
        account: &AccountProvisioningRequest,
        user: &UserProvisioningRequest,
    ) -> S1Result<ProvisioningOutcome> {
        let account = reconcile_account(self.api.as_ref(), account).await?;
        let user = reconcile_user(self.api.as_ref(), user, &account.id).await?;

        if self.reset_password {
            self.api.reset_user_password(&user.id).await?;
        }

        info!(account_id = %account.id, user_id = %user.id, "provisioned account");
        Ok(ProvisioningOutcome {
            account,
            user,
            password_reset_sent: self.reset_password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::S1Error;
    use crate::testing::InMemoryPlatform;
    use chrono::{TimeZone, Utc};
    use s1_model::AccountState;

    fn account_request() -> AccountProvisioningRequest {
        AccountProvisioningRequest::new("Acme", "720h")
            .with_account_type("Paid")
            .with_bundle("complete", 25)
            .with_modules(["rso"])
    }

    fn user_request() -> UserProvisioningRequest {
        UserProvisioningRequest::new("Jane", "Doe", "jane@acme.test", "Admin")
    }

    #[tokio::test]
    async fn test_provision_fresh_tenant() {
        let platform = Arc::new(InMemoryPlatform::default());
        let provisioner = Provisioner::new(platform.clone()).with_password_reset(true);

        let outcome = provisioner
            .provision(&account_request(), &user_request())
            .await
            .unwrap();

        assert!(outcome.password_reset_sent);
        assert!(outcome.user.has_scope(&outcome.account.id));
        assert_eq!(platform.password_resets(), vec![outcome.user.id.clone()]);
        assert_eq!(platform.accounts().len(), 1);
        assert_eq!(platform.users().len(), 1);
    }

    #[tokio::test]
    async fn test_provision_is_idempotent() {
        let platform = Arc::new(InMemoryPlatform::default());
        let provisioner = Provisioner::new(platform.clone());

        let first = provisioner
            .provision(&account_request(), &user_request())
            .await
            .unwrap();
        let second = provisioner
            .provision(&account_request(), &user_request())
            .await
            .unwrap();

        assert_eq!(first.account.id, second.account.id);
        assert_eq!(first.user.id, second.user.id);
        assert!(!second.password_reset_sent);

        let calls = platform.calls();
        assert_eq!(calls.create_account, 1);
        assert_eq!(calls.create_user, 1);
        assert_eq!(calls.update_user, 0);
        assert_eq!(calls.reset_password, 0);
    }

    #[tokio::test]
    async fn test_expired_account_stops_before_users() {
        let platform = Arc::new(InMemoryPlatform::default());
        let expiration = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        platform.insert_account("1001", "Acme", AccountState::Expired, expiration);
        let provisioner = Provisioner::new(platform.clone()).with_password_reset(true);

        let err = provisioner
            .provision(&account_request(), &user_request())
            .await
            .unwrap_err();

        assert!(matches!(err, S1Error::AccountExpired { .. }));
        let calls = platform.calls();
        assert_eq!(calls.find_user, 0);
        assert_eq!(calls.reset_password, 0);
    }

    #[tokio::test]
    async fn test_existing_admin_joins_second_account() {
        let platform = Arc::new(InMemoryPlatform::default());
        let provisioner = Provisioner::new(platform.clone());

        let first = provisioner
            .provision(&account_request(), &user_request())
            .await
            .unwrap();
        let other = AccountProvisioningRequest::new("Globex", "720h");
        let second = provisioner.provision(&other, &user_request()).await.unwrap();

        assert_ne!(first.account.id, second.account.id);
        assert_eq!(first.user.id, second.user.id);
        assert!(second.user.has_scope(&first.account.id));
        assert!(second.user.has_scope(&second.account.id));
        assert_eq!(platform.calls().update_user, 1);
    }
}
