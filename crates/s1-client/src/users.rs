//! User lookup, creation, role assignment, password reset and reconciliation.
//!
//! [`reconcile_user`] makes sure a user administers an account:
//!
//! - an existing user that already has a role in the account is returned as-is;
//! - an existing user without one is granted the account's `Admin` role;
//! - a missing user is created with the requested role.
//!
//! The asymmetry between the last two cases matches how accounts have been
//! provisioned so far and is kept for compatibility with existing remote state.

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info, instrument};

use s1_model::{ScopeRole, User, UserProvisioningRequest, ACCOUNT_SCOPE, ADMIN_ROLE};

use crate::api::ProvisioningApi;
use crate::codec::{
    AffectedData, CreateUserData, DataBody, IdsFilterBody, NewScopeRole, UpdateScopeRolesData,
    UserObject,
};
use crate::error::{S1Error, S1Result};
use crate::roles::resolve_role;
use crate::transport::{logged, S1Client};

/// Length of the throwaway password set on new users.
pub const GENERATED_PASSWORD_LEN: usize = 32;

impl S1Client {
    /// Search for the user with the given email address.
    ///
    /// Returns `Ok(None)` if no user matches.
    #[instrument(skip(self))]
    pub async fn find_user(&self, email_address: &str) -> S1Result<Option<User>> {
        debug!("searching for user");

        // email addresses are unique, so at most one user can match
        let envelope = self
            .get("/users", &[("email", email_address), ("limit", "1")])
            .await?;
        let users: Vec<UserObject> = envelope.into_data("user list").map_err(logged)?;

        Ok(users.into_iter().next().map(User::from))
    }

    /// Create a user holding `request.role` in the account.
    #[instrument(skip(self, request, password), fields(email_address = %request.email_address))]
    pub async fn create_user(
        &self,
        request: &UserProvisioningRequest,
        account_id: &str,
        password: &str,
    ) -> S1Result<User> {
        let body = DataBody::new(CreateUserData {
            email: request.email_address.clone(),
            password: password.to_string(),
            full_name: request.full_name(),
            scope: ACCOUNT_SCOPE.to_string(),
            scope_roles: vec![NewScopeRole {
                id: account_id.to_string(),
                role_name: request.role.clone(),
            }],
            two_fa_enabled: true,
        });
        let envelope = self.post("/users", &body).await?;
        let object: UserObject = envelope.into_data("created user").map_err(logged)?;
        Ok(User::from(object))
    }

    /// Replace the scope roles of a user.
    #[instrument(skip(self, scope_roles))]
    pub async fn update_user_scope_roles(
        &self,
        user_id: &str,
        scope_roles: &[ScopeRole],
    ) -> S1Result<User> {
        debug!(count = scope_roles.len(), "updating scope roles for user");

        let body = DataBody::new(UpdateScopeRolesData::new(scope_roles));
        let envelope = self.put(&format!("/users/{}", user_id), &body).await?;
        let object: UserObject = envelope.into_data("updated user").map_err(logged)?;
        Ok(User::from(object))
    }

    /// Trigger a password reset email for one user.
    #[instrument(skip(self))]
    pub async fn reset_user_password(&self, user_id: &str) -> S1Result<()> {
        info!("resetting user password");

        let body = IdsFilterBody::single(user_id);
        let envelope = self
            .post("/users/login/send-reset-password-email", &body)
            .await?;
        let data: AffectedData = envelope.into_data("password reset result").map_err(logged)?;

        if data.affected == 0 {
            return Err(logged(S1Error::PasswordResetFailed {
                user_id: user_id.to_string(),
            }));
        }
        Ok(())
    }
}

/// Generate a random alphanumeric password.
///
/// New users receive one only because the create call requires it; it is
/// neither stored nor returned, and access goes through a password reset.
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

/// Make sure the requested user administers the account.
///
/// Never adds a second scope role for an account the user already has one in.
#[instrument(skip(api, request), fields(email_address = %request.email_address))]
pub async fn reconcile_user<A>(
    api: &A,
    request: &UserProvisioningRequest,
    account_id: &str,
) -> S1Result<User>
where
    A: ProvisioningApi + ?Sized,
{
    let existing = api.find_user(&request.email_address).await?;
    let admin = resolve_role(api, account_id, ADMIN_ROLE).await?;

    match existing {
        Some(user) if user.has_scope(account_id) => {
            info!(user_id = %user.id, "found existing user");
            Ok(user)
        }
        Some(mut user) => {
            info!(user_id = %user.id, role = %admin.name, "adding existing user to account");
            user.scope_roles
                .push(ScopeRole::new(account_id, admin.id, admin.name));
            api.update_user_scope_roles(&user.id, &user.scope_roles)
                .await
        }
        None => {
            info!(role = %request.role, "creating new user");
            let password = generate_password();
            api.create_user(request, account_id, &password).await
        }
    }
}
