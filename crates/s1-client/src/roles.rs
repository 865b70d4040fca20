//! Role lookup.
//!
//! Roles are resolved by exact name within one account scope. They are never
//! created by provisioning.

use tracing::{debug, error, instrument};

use s1_model::Role;

use crate::api::ProvisioningApi;
use crate::codec::RoleObject;
use crate::error::{S1Error, S1Result};
use crate::transport::{logged, S1Client};

impl S1Client {
    /// Search for the role with the given name in an account.
    ///
    /// Returns `Ok(None)` if no role matches.
    #[instrument(skip(self))]
    pub async fn find_role(&self, account_id: &str, name: &str) -> S1Result<Option<Role>> {
        debug!("searching for role in account");

        // role names are unique within an account
        let envelope = self
            .get(
                "/rbac/roles",
                &[("accountIds", account_id), ("name", name), ("limit", "1")],
            )
            .await?;
        let roles: Vec<RoleObject> = envelope.into_data("role list").map_err(logged)?;

        Ok(roles.into_iter().next().map(Role::from))
    }
}

/// Resolve a role that must exist in the account.
pub async fn resolve_role<A>(api: &A, account_id: &str, name: &str) -> S1Result<Role>
where
    A: ProvisioningApi + ?Sized,
{
    match api.find_role(account_id, name).await? {
        Some(role) => Ok(role),
        None => {
            let err = S1Error::RoleNotFound {
                account_id: account_id.to_string(),
                role: name.to_string(),
            };
            error!("{}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryPlatform;

    #[tokio::test]
    async fn test_resolve_role_in_account() {
        let platform = InMemoryPlatform::default();
        platform.insert_role("1001", "r-admin-1", "Admin");
        platform.insert_role("2002", "r-admin-2", "Admin");

        let role = resolve_role(&platform, "2002", "Admin").await.unwrap();
        assert_eq!(role.id, "r-admin-2");
    }

    #[tokio::test]
    async fn test_missing_role_is_an_error() {
        let platform = InMemoryPlatform::default();
        platform.insert_role("1001", "r-admin-1", "Admin");

        let err = resolve_role(&platform, "1001", "Auditor").await.unwrap_err();
        assert!(matches!(
            err,
            S1Error::RoleNotFound { ref account_id, ref role } if account_id == "1001" && role == "Auditor"
        ));
    }
}
