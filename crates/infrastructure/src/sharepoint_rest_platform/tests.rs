use std::time::Duration;

use reqwest::StatusCode;
use salary_folders_core::AppError;
use url::Url;

use super::auth::{parse_realm, refresh_deadline};
use super::odata::{
    Collection, FileRecord, FolderRecord, error_for_status, odata_error_message, quote_literal,
};
use super::{SharePointConfig, SharePointRestPlatform};

fn config(realm: Option<&str>) -> SharePointConfig {
    let Ok(site_url) = Url::parse("https://contoso.sharepoint.com/sites/hr") else {
        panic!("site url should parse");
    };

    SharePointConfig {
        site_url,
        client_id: "client-id".to_owned(),
        client_secret: "super-secret".to_owned(),
        realm: realm.map(str::to_owned),
    }
}

#[test]
fn parses_realm_from_bearer_challenge() {
    let challenge = r#"Bearer realm="6a1b2c3d-0000-4000-8000-000000000000",client_id="00000003-0000-0ff1-ce00-000000000000",trusted_issuers="00000001-0000-0000-c000-000000000000@*""#;

    assert_eq!(
        parse_realm(challenge).as_deref(),
        Some("6a1b2c3d-0000-4000-8000-000000000000")
    );
    assert_eq!(parse_realm("Bearer realm=\"\""), None);
    assert_eq!(parse_realm("NTLM"), None);
}

#[test]
fn quotes_alias_literals() {
    assert_eq!(quote_literal("Salaries"), "'Salaries'");
    assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
}

#[test]
fn api_url_keeps_alias_names_and_encodes_values() {
    let platform = SharePointRestPlatform::new(reqwest::Client::new(), config(Some("realm")));

    let url = platform.api_url(
        "web/siteusers/getByLoginName(@login)",
        &[
            ("@login", quote_literal("i:0#.f|membership|alice@contoso.com")),
            ("$select", "Id,Title".to_owned()),
        ],
    );

    let Ok(url) = url else {
        panic!("url should build");
    };
    assert_eq!(
        url.as_str(),
        "https://contoso.sharepoint.com/sites/hr/_api/web/siteusers/getByLoginName(@login)?@login=%27i%3A0%23.f%7Cmembership%7Calice%40contoso.com%27&$select=Id%2CTitle"
    );
}

#[test]
fn extracts_odata_error_code_and_message() {
    let body = r#"{"odata.error":{"code":"-2130575257, Microsoft.SharePoint.SPException","message":{"lang":"en-US","value":"A file or folder with the name Salaries/Alice already exists."}}}"#;

    assert_eq!(
        odata_error_message(body).as_deref(),
        Some(
            "-2130575257, Microsoft.SharePoint.SPException: A file or folder with the name Salaries/Alice already exists."
        )
    );
    assert_eq!(odata_error_message("<html>gateway</html>"), None);
}

#[test]
fn maps_platform_status_to_error_category() {
    let missing = error_for_status(
        StatusCode::NOT_FOUND,
        r#"{"odata.error":{"code":"-2146232832","message":{"value":"Group cannot be found."}}}"#,
    );
    assert!(matches!(missing, AppError::NotFound(message) if message.ends_with("Group cannot be found.")));

    let collision = error_for_status(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"odata.error":{"code":"-2130575257, Microsoft.SharePoint.SPException","message":{"value":"exists"}}}"#,
    );
    assert!(matches!(collision, AppError::Conflict(_)));

    let throttled = error_for_status(StatusCode::TOO_MANY_REQUESTS, "");
    assert!(matches!(throttled, AppError::Upstream(message) if message.starts_with("status 429")));
}

#[test]
fn maps_folder_records_and_skips_folders_without_list_items() {
    let body = r#"{"value":[
        {"Name":"Alice Martin","ServerRelativeUrl":"/sites/hr/Salaries/Alice Martin","ItemCount":3,"TimeLastModified":"2026-09-30T08:15:00Z","ListItemAllFields":{"Id":12,"EmployeeId":41}},
        {"Name":"Forms","ServerRelativeUrl":"/sites/hr/Salaries/Forms","ItemCount":0,"TimeLastModified":"2026-01-01T00:00:00Z","ListItemAllFields":{}}
    ]}"#;

    let Ok(records) = serde_json::from_str::<Collection<FolderRecord>>(body) else {
        panic!("folder collection should deserialize");
    };
    let mut folders = Vec::new();
    for record in records.value {
        let Ok(folder) = record.into_folder() else {
            panic!("folder record should map");
        };
        folders.extend(folder);
    }

    assert_eq!(folders.len(), 1);
    let folder = &folders[0];
    assert_eq!(folder.item_id().as_i64(), 12);
    assert_eq!(folder.employee_id().map(|id| id.as_i64()), Some(41));
    assert_eq!(folder.item_count(), 3);
    assert!(folder.last_modified().is_some());
}

#[test]
fn file_record_without_list_item_is_an_upstream_error() {
    let Ok(record) = serde_json::from_str::<FileRecord>(
        r#"{"Name":"Payslip.pdf","ServerRelativeUrl":"/sites/hr/Salaries/Alice/Payslip.pdf"}"#,
    ) else {
        panic!("file record should deserialize");
    };

    assert!(matches!(record.into_document(), Err(AppError::Upstream(_))));
}

#[test]
fn config_debug_redacts_client_secret() {
    let rendered = format!("{:?}", config(None));

    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("super-secret"));
}

#[test]
fn refresh_deadline_keeps_a_minute_of_margin() {
    let now = tokio::time::Instant::now();

    assert_eq!(
        refresh_deadline(now, Duration::from_secs(3600)),
        now + Duration::from_secs(3540)
    );
    assert_eq!(refresh_deadline(now, Duration::from_secs(30)), now);
}

#[test]
fn refresh_deadline_for_unrepresentable_lifetime_is_immediate() {
    let now = tokio::time::Instant::now();

    assert_eq!(refresh_deadline(now, Duration::MAX), now);
    assert_eq!(refresh_deadline(now, Duration::from_secs(u64::MAX)), now);
}
