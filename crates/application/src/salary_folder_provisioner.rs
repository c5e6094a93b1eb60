use std::sync::Arc;

use salary_folders_core::{AppError, LoginName};
use salary_folders_domain::{
    AuthorizationGroup, PermissionLevel, Principal, RoleAssignment, SalaryFolder,
};
use thiserror::Error;
use tracing::info;

use crate::{DocumentLibrary, GroupResolver, IdentityResolver, LibrarySettings, PrincipalDirectory};

/// Failure of one provisioning step.
///
/// The wrapped platform error is carried unmodified. Steps already completed
/// are not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    /// The payroll officers group does not exist.
    #[error("group '{0}' was not found")]
    GroupNotFound(String),

    /// The group lookup itself failed.
    #[error("group lookup failed: {0}")]
    GroupLookup(AppError),

    /// The employee login could not be resolved to a user principal.
    #[error("employee resolution failed: {0}")]
    PrincipalResolution(AppError),

    /// The folder could not be created, including name collisions.
    #[error("folder creation failed: {0}")]
    FolderCreation(AppError),

    /// Permission inheritance could not be broken.
    #[error("permission inheritance break failed: {0}")]
    InheritanceBreak(AppError),

    /// One of the two explicit grants could not be added.
    #[error("{} role assignment failed: {error}", .level.as_str())]
    RoleAssignment {
        /// Level that was being granted.
        level: PermissionLevel,
        /// Platform error.
        error: AppError,
    },

    /// The `EmployeeId` field could not be stamped.
    #[error("employee metadata binding failed: {0}")]
    MetadataBinding(AppError),
}

impl ProvisioningError {
    /// Returns the stable name of the step that failed.
    #[must_use]
    pub fn step(&self) -> &'static str {
        match self {
            Self::GroupNotFound(_) | Self::GroupLookup(_) => "resolve_group",
            Self::PrincipalResolution(_) => "ensure_employee",
            Self::FolderCreation(_) => "create_folder",
            Self::InheritanceBreak(_) => "break_inheritance",
            Self::RoleAssignment {
                level: PermissionLevel::Read,
                ..
            } => "grant_employee_read",
            Self::RoleAssignment {
                level: PermissionLevel::Contribute,
                ..
            } => "grant_group_contribute",
            Self::MetadataBinding(_) => "bind_employee",
        }
    }

    /// Returns the underlying platform error, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&AppError> {
        match self {
            Self::GroupNotFound(_) => None,
            Self::GroupLookup(error)
            | Self::PrincipalResolution(error)
            | Self::FolderCreation(error)
            | Self::InheritanceBreak(error)
            | Self::RoleAssignment { error, .. }
            | Self::MetadataBinding(error) => Some(error),
        }
    }
}

impl From<ProvisioningError> for AppError {
    fn from(value: ProvisioningError) -> Self {
        match value {
            ProvisioningError::GroupNotFound(name) => {
                AppError::NotFound(format!("group '{name}' was not found"))
            }
            other => match other.cause() {
                Some(error) => error.clone(),
                None => AppError::Internal(other.to_string()),
            },
        }
    }
}

/// Outcome of a completed provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedSalaryFolder {
    /// Created folder, bound to the employee.
    pub folder: SalaryFolder,
    /// Employee principal owning the folder.
    pub employee: Principal,
    /// Payroll officers group granted contribute access.
    pub group: AuthorizationGroup,
    /// Explicit grants added after inheritance was broken, in order.
    pub role_assignments: Vec<RoleAssignment>,
}

/// Creates an access-restricted salary folder for one employee.
///
/// Performs no authorization of its own; callers gate invocation on
/// [`crate::PayrollOfficerService`].
#[derive(Clone)]
pub struct SalaryFolderProvisioner {
    groups: GroupResolver,
    identities: IdentityResolver,
    library: Arc<dyn DocumentLibrary>,
    settings: LibrarySettings,
}

impl SalaryFolderProvisioner {
    /// Creates the provisioner from platform implementations.
    #[must_use]
    pub fn new(
        directory: Arc<dyn PrincipalDirectory>,
        library: Arc<dyn DocumentLibrary>,
        settings: LibrarySettings,
    ) -> Self {
        Self {
            groups: GroupResolver::new(directory.clone()),
            identities: IdentityResolver::new(directory),
            library,
            settings,
        }
    }

    /// Runs the provisioning sequence, stopping at the first failing step.
    ///
    /// Order: resolve group, ensure employee, create folder, break
    /// inheritance, grant employee read, grant group contribute, stamp
    /// `EmployeeId`. Inheritance must be broken before any grant is added.
    pub async fn provision(
        &self,
        employee_login: &LoginName,
    ) -> Result<ProvisionedSalaryFolder, ProvisioningError> {
        let library = self.settings.library_name();

        let group = self
            .groups
            .resolve(self.settings.payroll_officers_group_name())
            .await?;

        let employee = self.identities.ensure(employee_login).await?;

        let folder = self
            .library
            .create_folder(library, employee.title())
            .await
            .map_err(ProvisioningError::FolderCreation)?;
        info!(
            folder = folder.name(),
            item_id = %folder.item_id(),
            employee_id = %employee.id(),
            "salary folder created"
        );

        self.library
            .break_role_inheritance(library, folder.item_id(), false)
            .await
            .map_err(ProvisioningError::InheritanceBreak)?;

        let role_assignments = vec![
            RoleAssignment::new(employee.id(), PermissionLevel::Read),
            RoleAssignment::new(group.id(), PermissionLevel::Contribute),
        ];
        for assignment in &role_assignments {
            self.library
                .add_role_assignment(library, folder.item_id(), *assignment)
                .await
                .map_err(|error| ProvisioningError::RoleAssignment {
                    level: assignment.level,
                    error,
                })?;
        }

        self.library
            .set_employee_binding(library, folder.item_id(), employee.id())
            .await
            .map_err(ProvisioningError::MetadataBinding)?;

        Ok(ProvisionedSalaryFolder {
            folder: folder.with_employee_id(Some(employee.id())),
            employee,
            group,
            role_assignments,
        })
    }
}

#[cfg(test)]
mod tests;
