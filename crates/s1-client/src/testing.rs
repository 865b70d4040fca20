//! In-memory stand-in for the management platform, used by unit tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use s1_model::{
    Account, AccountProvisioningRequest, AccountState, Role, ScopeRole, User,
    UserProvisioningRequest, ACCOUNT_SCOPE,
};

use crate::api::ProvisioningApi;
use crate::error::{S1Error, S1Result};

/// Number of calls made per operation.
#[derive(Debug, Clone, Default)]
pub struct CallCounts {
    pub find_account: usize,
    pub create_account: usize,
    pub reactivate_account: usize,
    pub find_role: usize,
    pub find_user: usize,
    pub create_user: usize,
    pub update_user: usize,
    pub reset_password: usize,
}

/// A user creation as submitted to the platform.
#[derive(Debug, Clone)]
pub struct CreatedUser {
    pub email_address: String,
    pub full_name: String,
    pub password: String,
    pub account_id: String,
    pub role: String,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    roles: Vec<Role>,
    users: Vec<User>,
    calls: CallCounts,
    reactivations: Vec<(String, DateTime<Utc>)>,
    created_users: Vec<CreatedUser>,
    password_resets: Vec<String>,
    reject_reactivations: bool,
    next_id: u64,
}

impl State {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// Platform state held in memory.
///
/// Every account created here gets an `Admin` role, mirroring the
/// predefined roles a real account starts with.
#[derive(Default)]
pub struct InMemoryPlatform {
    state: Mutex<State>,
}

impl InMemoryPlatform {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> CallCounts {
        self.state().calls.clone()
    }

    pub fn insert_account(&self, id: &str, name: &str, state: AccountState, expiration: DateTime<Utc>) {
        self.state().accounts.push(Account {
            id: id.to_string(),
            name: name.to_string(),
            account_type: "Trial".to_string(),
            billing_mode: "subscription".to_string(),
            expiration,
            external_id: String::new(),
            state,
        });
    }

    pub fn insert_role(&self, account_id: &str, id: &str, name: &str) {
        self.state().roles.push(Role {
            id: id.to_string(),
            name: name.to_string(),
            account_name: String::new(),
            scope: ACCOUNT_SCOPE.to_string(),
            scope_id: account_id.to_string(),
            predefined: true,
            users_in_role: 0,
        });
    }

    pub fn insert_user(&self, id: &str, email_address: &str, scope_roles: Vec<ScopeRole>) {
        self.state().users.push(User {
            id: id.to_string(),
            email_address: email_address.to_string(),
            email_verified: true,
            two_factor_status: "configured".to_string(),
            scope: ACCOUNT_SCOPE.to_string(),
            scope_roles,
        });
    }

    /// Make reactivations report `success: false`.
    pub fn fail_reactivations(&self) {
        self.state().reject_reactivations = true;
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.state().accounts.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state().users.clone()
    }

    pub fn reactivations(&self) -> Vec<(String, DateTime<Utc>)> {
        self.state().reactivations.clone()
    }

    pub fn created_users(&self) -> Vec<CreatedUser> {
        self.state().created_users.clone()
    }

    pub fn password_resets(&self) -> Vec<String> {
        self.state().password_resets.clone()
    }
}

#[async_trait]
impl ProvisioningApi for InMemoryPlatform {
    async fn find_account(&self, name: &str) -> S1Result<Option<Account>> {
        let mut state = self.state();
        state.calls.find_account += 1;
        Ok(state.accounts.iter().find(|a| a.name == name).cloned())
    }

    async fn create_account(
        &self,
        request: &AccountProvisioningRequest,
        expiration: DateTime<Utc>,
    ) -> S1Result<Account> {
        let mut state = self.state();
        state.calls.create_account += 1;

        let id = state.next_id("acct");
        let account = Account {
            id: id.clone(),
            name: request.name.clone(),
            account_type: request.account_type.clone(),
            billing_mode: "subscription".to_string(),
            expiration,
            external_id: request.external_id.clone(),
            state: AccountState::Active,
        };
        state.accounts.push(account.clone());

        let role_id = state.next_id("role");
        drop(state);
        self.insert_role(&id, &role_id, s1_model::ADMIN_ROLE);

        Ok(account)
    }

    async fn reactivate_account(&self, account_id: &str, expiration: DateTime<Utc>) -> S1Result<()> {
        let mut state = self.state();
        state.calls.reactivate_account += 1;

        if state.reject_reactivations {
            return Err(S1Error::ReactivationFailed {
                account_id: account_id.to_string(),
            });
        }
        state.reactivations.push((account_id.to_string(), expiration));
        if let Some(account) = state.accounts.iter_mut().find(|a| a.id == account_id) {
            account.state = AccountState::Active;
            account.expiration = expiration;
        }
        Ok(())
    }

    async fn find_role(&self, account_id: &str, name: &str) -> S1Result<Option<Role>> {
        let mut state = self.state();
        state.calls.find_role += 1;
        Ok(state
            .roles
            .iter()
            .find(|r| r.scope_id == account_id && r.name == name)
            .cloned())
    }

    async fn find_user(&self, email_address: &str) -> S1Result<Option<User>> {
        let mut state = self.state();
        state.calls.find_user += 1;
        Ok(state
            .users
            .iter()
            .find(|u| u.email_address == email_address)
            .cloned())
    }

    async fn create_user(
        &self,
        request: &UserProvisioningRequest,
        account_id: &str,
        password: &str,
    ) -> S1Result<User> {
        let mut state = self.state();
        state.calls.create_user += 1;

        let role_id = state
            .roles
            .iter()
            .find(|r| r.scope_id == account_id && r.name == request.role)
            .map(|r| r.id.clone())
            .unwrap_or_default();
        let user = User {
            id: state.next_id("user"),
            email_address: request.email_address.clone(),
            email_verified: false,
            two_factor_status: "not_configured".to_string(),
            scope: ACCOUNT_SCOPE.to_string(),
            scope_roles: vec![ScopeRole::new(account_id, role_id, request.role.clone())],
        };
        state.users.push(user.clone());
        state.created_users.push(CreatedUser {
            email_address: request.email_address.clone(),
            full_name: request.full_name(),
            password: password.to_string(),
            account_id: account_id.to_string(),
            role: request.role.clone(),
        });
        Ok(user)
    }

    async fn update_user_scope_roles(&self, user_id: &str, scope_roles: &[ScopeRole]) -> S1Result<User> {
        let mut state = self.state();
        state.calls.update_user += 1;

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| S1Error::decode("updated user", "no such user"))?;
        user.scope_roles = scope_roles.to_vec();
        Ok(user.clone())
    }

    async fn reset_user_password(&self, user_id: &str) -> S1Result<()> {
        let mut state = self.state();
        state.calls.reset_password += 1;

        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(S1Error::PasswordResetFailed {
                user_id: user_id.to_string(),
            });
        }
        state.password_resets.push(user_id.to_string());
        Ok(())
    }
}
