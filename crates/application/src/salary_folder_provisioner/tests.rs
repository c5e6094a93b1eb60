use std::sync::Arc;

use salary_folders_core::AppError;
use salary_folders_domain::{PermissionLevel, RoleAssignment, SalaryFolder};

use crate::test_support::{
    FakePlatform, FakeStep, GROUP, LIBRARY, PlatformCall, item_id, login, settings,
};

use super::{ProvisioningError, SalaryFolderProvisioner};

fn provisioner(platform: &Arc<FakePlatform>) -> SalaryFolderProvisioner {
    SalaryFolderProvisioner::new(platform.clone(), platform.clone(), settings())
}

fn seeded_platform() -> FakePlatform {
    FakePlatform::default()
        .with_group(GROUP)
        .with_identity_provider_account("antoine@contoso.com", "Antoine Pichot")
}

#[tokio::test]
async fn provision_grants_exactly_employee_read_and_group_contribute() {
    let platform = Arc::new(seeded_platform());
    let result = provisioner(&platform)
        .provision(&login("antoine@contoso.com"))
        .await;

    let Ok(provisioned) = result else {
        panic!("provisioning should succeed");
    };
    let Some(group) = platform.group(GROUP) else {
        panic!("seeded group should exist");
    };

    assert_eq!(provisioned.folder.name(), "Antoine Pichot");
    assert_eq!(provisioned.employee.title(), "Antoine Pichot");
    assert_eq!(
        provisioned.role_assignments,
        vec![
            RoleAssignment::new(provisioned.employee.id(), PermissionLevel::Read),
            RoleAssignment::new(group.id(), PermissionLevel::Contribute),
        ]
    );
    assert_eq!(
        provisioned.folder.employee_id(),
        Some(provisioned.employee.id())
    );
}

#[tokio::test]
async fn provision_runs_steps_in_fixed_order() {
    let platform = Arc::new(seeded_platform());
    let result = provisioner(&platform)
        .provision(&login("antoine@contoso.com"))
        .await;
    let Ok(provisioned) = result else {
        panic!("provisioning should succeed");
    };

    let folder_id = provisioned.folder.item_id();
    let employee_id = provisioned.employee.id();
    assert_eq!(
        platform.calls().await,
        vec![
            PlatformCall::FindGroup(GROUP.to_owned()),
            PlatformCall::EnsureUser("i:0#.f|membership|antoine@contoso.com".to_owned()),
            PlatformCall::CreateFolder {
                library: LIBRARY.to_owned(),
                name: "Antoine Pichot".to_owned(),
            },
            PlatformCall::BreakInheritance {
                item_id: folder_id,
                copy: false,
            },
            PlatformCall::AddRoleAssignment {
                item_id: folder_id,
                assignment: provisioned.role_assignments[0],
            },
            PlatformCall::AddRoleAssignment {
                item_id: folder_id,
                assignment: provisioned.role_assignments[1],
            },
            PlatformCall::SetEmployeeBinding {
                item_id: folder_id,
                employee_id,
            },
        ]
    );
}

#[tokio::test]
async fn missing_group_aborts_before_any_folder_is_created() {
    let platform = Arc::new(
        FakePlatform::default().with_identity_provider_account("antoine@contoso.com", "Antoine"),
    );
    let result = provisioner(&platform)
        .provision(&login("antoine@contoso.com"))
        .await;

    assert!(matches!(result, Err(ProvisioningError::GroupNotFound(ref name)) if name == GROUP));
    assert!(platform.folders().await.is_empty());
    assert_eq!(platform.calls().await.len(), 1);
}

#[tokio::test]
async fn unknown_employee_is_a_principal_resolution_error() {
    let platform = Arc::new(seeded_platform());
    let result = provisioner(&platform)
        .provision(&login("nobody@contoso.com"))
        .await;

    assert!(matches!(
        result,
        Err(ProvisioningError::PrincipalResolution(AppError::NotFound(_)))
    ));
    assert!(platform.folders().await.is_empty());
}

#[tokio::test]
async fn duplicate_folder_name_surfaces_platform_error_unmapped() {
    let platform = Arc::new(seeded_platform().with_folder(SalaryFolder::new(
        item_id(3),
        "Antoine Pichot",
        "/sites/hr/Salaries/Antoine Pichot",
    )));
    let result = provisioner(&platform)
        .provision(&login("antoine@contoso.com"))
        .await;

    let Err(error) = result else {
        panic!("duplicate folder should fail");
    };
    assert_eq!(error.step(), "create_folder");
    assert!(matches!(
        error,
        ProvisioningError::FolderCreation(AppError::Conflict(_))
    ));
    assert!(
        !platform
            .calls()
            .await
            .iter()
            .any(|call| matches!(call, PlatformCall::BreakInheritance { .. }))
    );
}

#[tokio::test]
async fn failed_grant_leaves_partial_folder_without_binding() {
    let platform = Arc::new(seeded_platform().failing_at(
        FakeStep::AddRoleAssignment,
        AppError::Upstream("principal id is invalid".to_owned()),
    ));
    let result = provisioner(&platform)
        .provision(&login("antoine@contoso.com"))
        .await;

    let Err(error) = result else {
        panic!("grant failure should abort provisioning");
    };
    assert_eq!(error.step(), "grant_employee_read");
    assert_eq!(platform.folders().await.len(), 1);
    assert!(
        !platform
            .calls()
            .await
            .iter()
            .any(|call| matches!(call, PlatformCall::SetEmployeeBinding { .. }))
    );
}

#[tokio::test]
async fn metadata_binding_failure_is_reported_as_its_own_step() {
    let platform = Arc::new(seeded_platform().failing_at(
        FakeStep::SetEmployeeBinding,
        AppError::Upstream("Column 'EmployeeId' does not exist".to_owned()),
    ));
    let result = provisioner(&platform)
        .provision(&login("antoine@contoso.com"))
        .await;

    assert!(matches!(result, Err(ProvisioningError::MetadataBinding(_))));
}

#[tokio::test]
async fn ensure_reuses_already_materialized_employee() {
    let platform = Arc::new(
        FakePlatform::default()
            .with_group(GROUP)
            .with_named_user("stephane@contoso.com", "Stéphane Mertz"),
    );
    let Some(existing) = platform.user("stephane@contoso.com") else {
        panic!("seeded user should exist");
    };

    let result = provisioner(&platform)
        .provision(&login("i:0#.f|membership|stephane@contoso.com"))
        .await;

    let Ok(provisioned) = result else {
        panic!("provisioning should succeed");
    };
    assert_eq!(provisioned.employee.id(), existing.id());
}

#[test]
fn provisioning_errors_convert_to_underlying_app_errors() {
    let not_found: AppError = ProvisioningError::GroupNotFound(GROUP.to_owned()).into();
    assert!(matches!(not_found, AppError::NotFound(_)));

    let conflict: AppError =
        ProvisioningError::FolderCreation(AppError::Conflict("exists".to_owned())).into();
    assert_eq!(conflict, AppError::Conflict("exists".to_owned()));

    let grant = ProvisioningError::RoleAssignment {
        level: PermissionLevel::Contribute,
        error: AppError::Upstream("denied".to_owned()),
    };
    assert_eq!(grant.step(), "grant_group_contribute");
    assert_eq!(
        grant.to_string(),
        "contribute role assignment failed: upstream error: denied"
    );
}

#[tokio::test]
async fn display_name_is_passed_to_platform_unaltered() {
    let platform = Arc::new(
        FakePlatform::default()
            .with_group(GROUP)
            .with_identity_provider_account("anne@contoso.com", "Anne #2 100%"),
    );

    let result = provisioner(&platform)
        .provision(&login("anne@contoso.com"))
        .await;

    let Ok(provisioned) = result else {
        panic!("provisioning should succeed");
    };
    assert_eq!(provisioned.folder.name(), "Anne #2 100%");
    assert!(platform.calls().await.contains(&PlatformCall::CreateFolder {
        library: LIBRARY.to_owned(),
        name: "Anne #2 100%".to_owned(),
    }));
}
