use std::sync::Arc;

use salary_folders_core::{AppError, LoginName};
use salary_folders_domain::{AuthorizationGroup, Principal, PrincipalKind};

use crate::{PrincipalDirectory, ProvisioningError};

/// Looks up the privileged group's canonical record.
#[derive(Clone)]
pub struct GroupResolver {
    directory: Arc<dyn PrincipalDirectory>,
}

impl GroupResolver {
    /// Creates a resolver over a directory implementation.
    #[must_use]
    pub fn new(directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves a group by display name.
    pub async fn resolve(&self, name: &str) -> Result<AuthorizationGroup, ProvisioningError> {
        let principal = self
            .directory
            .find_group_by_name(name)
            .await
            .map_err(ProvisioningError::GroupLookup)?
            .ok_or_else(|| ProvisioningError::GroupNotFound(name.to_owned()))?;

        AuthorizationGroup::new(principal).map_err(ProvisioningError::GroupLookup)
    }
}

/// Ensures an employee exists as a site principal and returns its record.
#[derive(Clone)]
pub struct IdentityResolver {
    directory: Arc<dyn PrincipalDirectory>,
}

impl IdentityResolver {
    /// Creates a resolver over a directory implementation.
    #[must_use]
    pub fn new(directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves the user, creating the site principal when it is not yet
    /// materialized.
    pub async fn ensure(&self, login_name: &LoginName) -> Result<Principal, ProvisioningError> {
        let principal = self
            .directory
            .ensure_user(login_name)
            .await
            .map_err(ProvisioningError::PrincipalResolution)?;

        if principal.kind() != PrincipalKind::User {
            return Err(ProvisioningError::PrincipalResolution(AppError::Validation(
                format!("'{login_name}' resolved to a group, not a user"),
            )));
        }

        Ok(principal)
    }
}
