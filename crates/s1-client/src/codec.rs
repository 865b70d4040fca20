//! Resource codecs.
//!
//! Wire representations of accounts, users and roles, the request bodies
//! sent to the management API, and conversions to and from the domain model
//! in `s1-model`. Wire objects use the platform's camelCase field names and
//! carry timestamps as RFC 3339 strings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use s1_model::{Account, AccountProvisioningRequest, Role, ScopeRole, User, ACCOUNT_SCOPE};

use crate::envelope::null_as_default;
use crate::error::{S1Error, S1Result};

/// Billing mode given to every account created by provisioning.
pub const BILLING_MODE: &str = "subscription";

/// Usage type given to every account created by provisioning.
pub const USAGE_TYPE: &str = "customer";

/// Name of the license surface that carries the agent count.
pub const TOTAL_AGENTS_SURFACE: &str = "Total Agents";

/// Format a timestamp the way the platform expects it.
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a platform timestamp.
pub fn parse_timestamp(value: &str) -> S1Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| S1Error::InvalidTimestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}

/// Account as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountObject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub billing_mode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expiration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
}

impl TryFrom<AccountObject> for Account {
    type Error = S1Error;

    fn try_from(o: AccountObject) -> Result<Self, Self::Error> {
        let expiration = parse_timestamp(&o.expiration)?;
        Ok(Account {
            id: o.id,
            name: o.name,
            account_type: o.account_type,
            billing_mode: o.billing_mode,
            expiration,
            external_id: o.external_id,
            state: o.state.into(),
        })
    }
}

impl From<&Account> for AccountObject {
    fn from(account: &Account) -> Self {
        AccountObject {
            id: account.id.clone(),
            account_type: account.account_type.clone(),
            billing_mode: account.billing_mode.clone(),
            expiration: format_timestamp(account.expiration),
            external_id: account.external_id.clone(),
            name: account.name.clone(),
            state: account.state.to_string(),
        }
    }
}

/// Scope role as carried on a user object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeRoleObject {
    #[serde(rename = "id", default, deserialize_with = "null_as_default")]
    pub scope_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role_name: String,
}

impl From<ScopeRoleObject> for ScopeRole {
    fn from(o: ScopeRoleObject) -> Self {
        ScopeRole {
            scope_id: o.scope_id,
            role_id: o.role_id,
            role_name: o.role_name,
        }
    }
}

impl From<&ScopeRole> for ScopeRoleObject {
    fn from(role: &ScopeRole) -> Self {
        ScopeRoleObject {
            scope_id: role.scope_id.clone(),
            role_id: role.role_id.clone(),
            role_name: role.role_name.clone(),
        }
    }
}

/// User as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserObject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename = "email", default, deserialize_with = "null_as_default")]
    pub email_address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email_verified: bool,
    #[serde(rename = "twoFaStatus", default, deserialize_with = "null_as_default")]
    pub two_factor_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope_roles: Vec<ScopeRoleObject>,
}

impl From<UserObject> for User {
    fn from(o: UserObject) -> Self {
        User {
            id: o.id,
            email_address: o.email_address,
            email_verified: o.email_verified,
            two_factor_status: o.two_factor_status,
            scope: o.scope,
            scope_roles: o.scope_roles.into_iter().map(ScopeRole::from).collect(),
        }
    }
}

/// Role as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleObject {
    #[serde(default, deserialize_with = "null_as_default")]
    pub account_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predefined_role: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope_id: String,
    #[serde(rename = "usersInRoles", default, deserialize_with = "null_as_default")]
    pub users_in_role: u64,
}

impl From<RoleObject> for Role {
    fn from(o: RoleObject) -> Self {
        Role {
            id: o.id,
            name: o.name,
            account_name: o.account_name,
            scope: o.scope,
            scope_id: o.scope_id,
            predefined: o.predefined_role,
            users_in_role: o.users_in_role,
        }
    }
}

/// Payload of calls that only report success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuccessData {
    #[serde(default)]
    pub success: bool,
}

/// Payload of calls that report how many records were affected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffectedData {
    #[serde(default)]
    pub affected: u64,
}

/// Request body wrapper placing the payload under `data`.
#[derive(Debug, Clone, Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

impl<T> DataBody<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Body of the create account call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountData {
    pub name: String,
    pub account_type: String,
    pub billing_mode: String,
    pub expiration: String,
    pub external_id: String,
    pub inherits: bool,
    pub licenses: Licenses,
    pub unlimited_expiration: bool,
    pub usage_type: String,
}

impl CreateAccountData {
    /// Build the create body for a request with a resolved expiration.
    pub fn new(request: &AccountProvisioningRequest, expiration: DateTime<Utc>) -> Self {
        Self {
            name: request.name.clone(),
            account_type: request.account_type.clone(),
            billing_mode: BILLING_MODE.to_string(),
            expiration: format_timestamp(expiration),
            external_id: request.external_id.clone(),
            inherits: true,
            licenses: Licenses {
                bundles: vec![Bundle {
                    name: request.bundle.clone(),
                    surfaces: vec![Surface {
                        count: request.total_agents,
                        name: TOTAL_AGENTS_SURFACE.to_string(),
                    }],
                }],
                modules: request
                    .modules
                    .iter()
                    .map(|name| Module { name: name.clone() })
                    .collect(),
                settings: default_account_settings(),
            },
            unlimited_expiration: false,
            usage_type: USAGE_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Licenses {
    pub bundles: Vec<Bundle>,
    pub modules: Vec<Module>,
    pub settings: Vec<LicenseSetting>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bundle {
    pub name: String,
    pub surfaces: Vec<Surface>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Surface {
    pub count: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Module {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseSetting {
    pub group_name: String,
    pub setting: String,
}

/// Platform settings applied verbatim to every new account.
pub fn default_account_settings() -> Vec<LicenseSetting> {
    [
        ("dv_retention", "30 Days"),
        ("malicious_data_retention", "365 Days"),
        ("remote_shell_availability", "Enabled"),
        ("marketplace_access_status", "Available"),
        ("account_level_ranger", "Account"),
    ]
    .into_iter()
    .map(|(group_name, setting)| LicenseSetting {
        group_name: group_name.to_string(),
        setting: setting.to_string(),
    })
    .collect()
}

/// Body of the reactivate account call.
#[derive(Debug, Clone, Serialize)]
pub struct ReactivateAccountData {
    pub unlimited: bool,
    pub expiration: String,
}

impl ReactivateAccountData {
    pub fn new(expiration: DateTime<Utc>) -> Self {
        Self {
            unlimited: false,
            expiration: format_timestamp(expiration),
        }
    }
}

/// Body of the create user call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserData {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub scope: String,
    pub scope_roles: Vec<NewScopeRole>,
    pub two_fa_enabled: bool,
}

/// Scope role on a new user, referencing the role by name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewScopeRole {
    pub id: String,
    pub role_name: String,
}

/// Body of the update user call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScopeRolesData {
    pub scope: String,
    pub scope_roles: Vec<ScopeRoleObject>,
}

impl UpdateScopeRolesData {
    pub fn new(scope_roles: &[ScopeRole]) -> Self {
        Self {
            scope: ACCOUNT_SCOPE.to_string(),
            scope_roles: scope_roles.iter().map(ScopeRoleObject::from).collect(),
        }
    }
}

/// Body of calls that target users by id.
#[derive(Debug, Clone, Serialize)]
pub struct IdsFilterBody {
    pub filter: IdsFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdsFilter {
    pub ids: Vec<String>,
}

impl IdsFilterBody {
    pub fn single(id: impl Into<String>) -> Self {
        Self {
            filter: IdsFilter { ids: vec![id.into()] },
        }
    }
}
