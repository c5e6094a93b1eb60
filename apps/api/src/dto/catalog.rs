use salary_folders_application::CallerContext;
use salary_folders_domain::{SalaryDocument, SalaryFolder, SalaryFolderPermissions};
use serde::Serialize;
use ts_rs::TS;

/// API representation of a salary folder.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/salary-folder-response.ts"
)]
pub struct SalaryFolderResponse {
    pub id: i64,
    pub name: String,
    pub server_relative_url: String,
    pub employee_id: Option<i64>,
    pub employee_account_name: Option<String>,
    pub item_count: u32,
    pub last_modified: Option<String>,
}

impl From<SalaryFolder> for SalaryFolderResponse {
    fn from(folder: SalaryFolder) -> Self {
        Self {
            id: folder.item_id().as_i64(),
            name: folder.name().to_owned(),
            server_relative_url: folder.server_relative_url().to_owned(),
            employee_id: folder.employee_id().map(|employee_id| employee_id.as_i64()),
            employee_account_name: folder.employee_account_name().map(str::to_owned),
            item_count: folder.item_count(),
            last_modified: folder
                .last_modified()
                .map(|timestamp| timestamp.to_rfc3339()),
        }
    }
}

/// API representation of a salary document.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/salary-document-response.ts"
)]
pub struct SalaryDocumentResponse {
    pub id: i64,
    pub name: String,
    pub server_relative_url: String,
}

impl From<SalaryDocument> for SalaryDocumentResponse {
    fn from(document: SalaryDocument) -> Self {
        Self {
            id: document.item_id.as_i64(),
            name: document.name,
            server_relative_url: document.server_relative_url,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/salary-folder-permissions-response.ts"
)]
pub struct SalaryFolderPermissionsResponse {
    pub can_read_files: bool,
    pub can_add_files: bool,
}

impl From<SalaryFolderPermissions> for SalaryFolderPermissionsResponse {
    fn from(permissions: SalaryFolderPermissions) -> Self {
        Self {
            can_read_files: permissions.can_read_files,
            can_add_files: permissions.can_add_files,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/upload-documents-response.ts"
)]
pub struct UploadDocumentsResponse {
    pub uploaded: u32,
}

/// Roles of the acting identity.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/caller-context-response.ts"
)]
pub struct CallerContextResponse {
    pub login_name: String,
    pub is_payroll_officer: bool,
    pub is_site_admin: bool,
}

impl From<CallerContext> for CallerContextResponse {
    fn from(context: CallerContext) -> Self {
        Self {
            login_name: context.login_name.as_str().to_owned(),
            is_payroll_officer: context.is_payroll_officer,
            is_site_admin: context.is_site_admin,
        }
    }
}
