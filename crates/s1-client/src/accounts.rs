//! Account lookup, creation, reactivation and reconciliation.
//!
//! [`reconcile_account`] decides, from the current remote state, whether to
//! create, adopt or reactivate an account:
//!
//! ```text
//! not found ─→ create
//! active    ─→ adopt as-is (expiration untouched)
//! expired   ─→ reactivate if requested, otherwise fail
//! other     ─→ fail
//! ```
//!
//! Account names are unique on the platform, so a name lookup is the whole
//! identity check. Running the same request twice never creates twice.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument};

use s1_model::{Account, AccountProvisioningRequest, AccountState};

use crate::api::ProvisioningApi;
use crate::codec::{
    parse_timestamp, AccountObject, CreateAccountData, DataBody, ReactivateAccountData, SuccessData,
};
use crate::error::{S1Error, S1Result};
use crate::transport::{logged, S1Client};

impl S1Client {
    /// Search for the account with the given name.
    ///
    /// Returns `Ok(None)` if no account matches.
    #[instrument(skip(self))]
    pub async fn find_account(&self, name: &str) -> S1Result<Option<Account>> {
        debug!("searching for account");

        // names are unique, so at most one account can match
        let envelope = self
            .get("/accounts", &[("name", name), ("limit", "1")])
            .await?;
        let accounts: Vec<AccountObject> = envelope.into_data("account list").map_err(logged)?;

        accounts
            .into_iter()
            .next()
            .map(|object| Account::try_from(object).map_err(logged))
            .transpose()
    }

    /// Create a new account that expires at `expiration`.
    #[instrument(skip(self, request), fields(account_name = %request.name))]
    pub async fn create_account(
        &self,
        request: &AccountProvisioningRequest,
        expiration: DateTime<Utc>,
    ) -> S1Result<Account> {
        let body = DataBody::new(CreateAccountData::new(request, expiration));
        let envelope = self.post("/accounts", &body).await?;
        let object: AccountObject = envelope.into_data("created account").map_err(logged)?;
        Account::try_from(object).map_err(logged)
    }

    /// Reactivate an expired account until `expiration`.
    #[instrument(skip(self))]
    pub async fn reactivate_account(
        &self,
        account_id: &str,
        expiration: DateTime<Utc>,
    ) -> S1Result<()> {
        let body = DataBody::new(ReactivateAccountData::new(expiration));
        let envelope = self
            .put(&format!("/accounts/{}/reactivate", account_id), &body)
            .await?;
        let data: SuccessData = envelope.into_data("reactivation result").map_err(logged)?;

        if !data.success {
            return Err(logged(S1Error::ReactivationFailed {
                account_id: account_id.to_string(),
            }));
        }
        Ok(())
    }
}

/// Resolve a requested expiration against `now`.
///
/// A duration (`"720h"`, `"1h30m"`, `"90d"`) is added to `now`; otherwise the
/// value must be an RFC 3339 timestamp.
pub fn resolve_expiration(expires: &str, now: DateTime<Utc>) -> S1Result<DateTime<Utc>> {
    let invalid = || S1Error::InvalidExpiration {
        value: expires.to_string(),
    };
    let value = expires.trim();

    if let Ok(duration) = humantime::parse_duration(value) {
        let duration = chrono::Duration::from_std(duration).map_err(|_| invalid())?;
        return now.checked_add_signed(duration).ok_or_else(invalid);
    }
    parse_timestamp(value).map_err(|_| invalid())
}

/// Bring the requested account into existence, or adopt the existing one.
///
/// An active account is returned unchanged; its expiration is never extended.
/// An expired account is reactivated only when `request.reactivate_account`
/// is set, and keeps its identifier.
#[instrument(skip(api, request), fields(account_name = %request.name))]
pub async fn reconcile_account<A>(api: &A, request: &AccountProvisioningRequest) -> S1Result<Account>
where
    A: ProvisioningApi + ?Sized,
{
    let expiration = resolve_expiration(&request.expires, Utc::now()).map_err(|err| {
        error!(expiration_date = %request.expires, "{}", err);
        err
    })?;

    let account = match api.find_account(&request.name).await? {
        Some(account) => account,
        None => {
            info!(expires = %expiration, "creating new account");
            return api.create_account(request, expiration).await;
        }
    };

    match account.state {
        AccountState::Active => {
            info!(
                account_id = %account.id,
                expires = %account.expiration,
                "found existing active account"
            );
            Ok(account)
        }
        AccountState::Expired if request.reactivate_account => {
            info!(account_id = %account.id, expires = %expiration, "reactivating expired account");
            api.reactivate_account(&account.id, expiration).await?;
            Ok(Account {
                state: AccountState::Active,
                expiration,
                ..account
            })
        }
        AccountState::Expired => {
            let err = S1Error::AccountExpired { name: account.name };
            error!(account_id = %account.id, "{}", err);
            Err(err)
        }
        AccountState::Other(state) => {
            let err = S1Error::UnexpectedAccountState {
                name: account.name,
                state,
            };
            error!(account_id = %account.id, "{}", err);
            Err(err)
        }
    }
}
