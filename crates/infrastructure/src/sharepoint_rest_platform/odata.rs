use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use salary_folders_core::{AppError, AppResult};
use salary_folders_domain::{FolderItemId, Principal, PrincipalId, SalaryDocument, SalaryFolder};
use serde::Deserialize;
use serde_json::Value;

pub(super) const ODATA_JSON: &str = "application/json;odata=nometadata";

/// Platform error code raised when a folder or file name is already taken.
const NAME_COLLISION_CODE: &str = "-2130575257";

/// Quotes a string literal for use as an `@alias` value.
pub(super) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Extracts `code: message` from an `odata.error` body.
pub(super) fn odata_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    let error = value.get("odata.error").or_else(|| value.get("error"))?;

    let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
    let message = match error.get("message") {
        Some(Value::String(message)) => message.as_str(),
        Some(message) => message
            .get("value")
            .and_then(Value::as_str)
            .unwrap_or_default(),
        None => "",
    };

    match (code.is_empty(), message.is_empty()) {
        (true, true) => None,
        (true, false) => Some(message.to_owned()),
        (false, true) => Some(code.to_owned()),
        (false, false) => Some(format!("{code}: {message}")),
    }
}

pub(super) fn error_for_status(status: StatusCode, body: &str) -> AppError {
    let detail = odata_error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("unknown platform error")
            .to_owned()
    });

    if status == StatusCode::NOT_FOUND {
        return AppError::NotFound(detail);
    }

    if status == StatusCode::CONFLICT || detail.starts_with(NAME_COLLISION_CODE) {
        return AppError::Conflict(detail);
    }

    AppError::Upstream(format!("status {}: {detail}", status.as_u16()))
}

/// Collection envelope of `nometadata` responses.
#[derive(Debug, Deserialize)]
pub(super) struct Collection<T> {
    pub(super) value: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct GroupTitleRecord {
    pub(super) title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct UserRecord {
    pub(super) id: i64,
    pub(super) login_name: String,
    pub(super) title: String,
    #[serde(default)]
    pub(super) is_site_admin: bool,
    #[serde(default)]
    pub(super) groups: Vec<GroupTitleRecord>,
}

impl UserRecord {
    pub(super) fn to_principal(&self) -> AppResult<Principal> {
        Ok(Principal::user(
            PrincipalId::new(self.id)?,
            self.login_name.as_str(),
            self.title.as_str(),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct GroupRecord {
    pub(super) id: i64,
    pub(super) login_name: String,
    pub(super) title: String,
}

impl GroupRecord {
    pub(super) fn into_principal(self) -> AppResult<Principal> {
        Ok(Principal::group(
            PrincipalId::new(self.id)?,
            self.login_name,
            self.title,
        ))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct ListItemRecord {
    pub(super) id: Option<i64>,
    pub(super) employee_id: Option<i64>,
}

impl ListItemRecord {
    fn item_id(&self) -> AppResult<Option<FolderItemId>> {
        self.id.map(FolderItemId::new).transpose()
    }

    fn employee_id(&self) -> AppResult<Option<PrincipalId>> {
        self.employee_id.map(PrincipalId::new).transpose()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct FolderRecord {
    pub(super) name: String,
    pub(super) server_relative_url: String,
    #[serde(default)]
    pub(super) item_count: u32,
    #[serde(default)]
    pub(super) time_last_modified: Option<String>,
    #[serde(default)]
    pub(super) list_item_all_fields: Option<ListItemRecord>,
}

impl FolderRecord {
    /// Maps a folder that is backed by a list item.
    ///
    /// Folders without one, such as the library's forms folder, map to `None`.
    pub(super) fn into_folder(self) -> AppResult<Option<SalaryFolder>> {
        let fields = self.list_item_all_fields.unwrap_or_default();
        let Some(item_id) = fields.item_id()? else {
            return Ok(None);
        };

        let last_modified = self
            .time_last_modified
            .as_deref()
            .map(parse_timestamp)
            .transpose()?;

        Ok(Some(
            SalaryFolder::new(item_id, self.name, self.server_relative_url)
                .with_employee_id(fields.employee_id()?)
                .with_statistics(self.item_count, last_modified),
        ))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct FileRecord {
    pub(super) name: String,
    pub(super) server_relative_url: String,
    #[serde(default)]
    pub(super) list_item_all_fields: Option<ListItemRecord>,
}

impl FileRecord {
    pub(super) fn into_document(self) -> AppResult<SalaryDocument> {
        let item_id = self
            .list_item_all_fields
            .unwrap_or_default()
            .item_id()?
            .ok_or_else(|| {
                AppError::Upstream(format!(
                    "file '{}' has no list item",
                    self.server_relative_url
                ))
            })?;

        Ok(SalaryDocument {
            item_id,
            name: self.name,
            server_relative_url: self.server_relative_url,
        })
    }
}

fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Upstream(format!("invalid platform timestamp '{value}': {error}"))
        })
}
