use std::sync::Arc;

use salary_folders_core::{AppError, LoginName};

use crate::test_support::{FakePlatform, login, settings};

use super::PayrollOfficerService;

fn service(platform: FakePlatform) -> PayrollOfficerService {
    PayrollOfficerService::new(Arc::new(platform), settings())
}

#[tokio::test]
async fn member_of_payroll_group_is_privileged() {
    let platform = FakePlatform::default().with_user_groups(
        "officer@contoso.com",
        &["Members", "Payroll Officers"],
    );

    assert!(
        service(platform)
            .is_payroll_officer(&login("officer@contoso.com"))
            .await
    );
}

#[tokio::test]
async fn non_member_is_not_privileged() {
    let platform = FakePlatform::default().with_user_groups("alice@contoso.com", &["Members"]);

    assert!(
        !service(platform)
            .is_payroll_officer(&login("alice@contoso.com"))
            .await
    );
}

#[tokio::test]
async fn group_title_comparison_is_case_sensitive() {
    let platform =
        FakePlatform::default().with_user_groups("alice@contoso.com", &["payroll officers"]);

    assert!(
        !service(platform)
            .is_payroll_officer(&login("alice@contoso.com"))
            .await
    );
}

#[tokio::test]
async fn duplicated_membership_is_not_privileged() {
    let platform = FakePlatform::default().with_user_groups(
        "alice@contoso.com",
        &["Payroll Officers", "Payroll Officers"],
    );

    assert!(
        !service(platform)
            .is_payroll_officer(&login("alice@contoso.com"))
            .await
    );
}

#[tokio::test]
async fn lookup_failure_fails_closed() {
    let platform = FakePlatform::default()
        .with_user_groups("officer@contoso.com", &["Payroll Officers"])
        .failing_user_lookups(AppError::Upstream(
            "Access denied. You do not have permission to perform this action".to_owned(),
        ));

    assert!(
        !service(platform)
            .is_payroll_officer(&login("officer@contoso.com"))
            .await
    );
}

#[tokio::test]
async fn unknown_user_is_not_privileged() {
    let Ok(acting) = LoginName::new("ghost@contoso.com") else {
        panic!("login name should be valid");
    };

    assert!(!service(FakePlatform::default()).is_payroll_officer(&acting).await);
}

#[tokio::test]
async fn site_admin_lookup_failure_fails_closed() {
    let platform = FakePlatform::default()
        .with_site_admin("admin@contoso.com")
        .failing_user_lookups(AppError::Internal("boom".to_owned()));

    let service = service(platform);
    assert!(!service.is_site_admin(&login("admin@contoso.com")).await);
}
