//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod folder;
mod principal;
mod security;

pub use folder::{
    EMPLOYEE_ID_FIELD, FolderItemId, NewDocument, SYSTEM_FORMS_FOLDER, SalaryDocument,
    SalaryFolder, SalaryFolderPermissions,
};
pub use principal::{AuthorizationGroup, Principal, PrincipalId, PrincipalKind};
pub use security::{PermissionLevel, RoleAssignment};
