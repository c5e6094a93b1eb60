//! Salary folders and the documents they hold.

use chrono::{DateTime, Utc};
use salary_folders_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::PrincipalId;

/// Metadata field binding a folder or document to its employee.
pub const EMPLOYEE_ID_FIELD: &str = "EmployeeId";

/// Library folder created by the platform for list forms; never a salary folder.
pub const SYSTEM_FORMS_FOLDER: &str = "Forms";

/// List item identifier of a folder or document inside the salaries library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FolderItemId(i64);

impl FolderItemId {
    /// Creates an item identifier, rejecting non-positive values.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "item id must be positive, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for FolderItemId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Container scoped to exactly one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryFolder {
    item_id: FolderItemId,
    name: String,
    server_relative_url: String,
    employee_id: Option<PrincipalId>,
    employee_account_name: Option<String>,
    item_count: u32,
    last_modified: Option<DateTime<Utc>>,
}

impl SalaryFolder {
    /// Creates a folder reference with no employee binding or statistics.
    #[must_use]
    pub fn new(
        item_id: FolderItemId,
        name: impl Into<String>,
        server_relative_url: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            name: name.into(),
            server_relative_url: server_relative_url.into(),
            employee_id: None,
            employee_account_name: None,
            item_count: 0,
            last_modified: None,
        }
    }

    /// Sets the `EmployeeId` binding.
    #[must_use]
    pub fn with_employee_id(mut self, employee_id: Option<PrincipalId>) -> Self {
        self.employee_id = employee_id;
        self
    }

    /// Sets the resolved employee account name.
    #[must_use]
    pub fn with_employee_account_name(mut self, account_name: Option<String>) -> Self {
        self.employee_account_name = account_name;
        self
    }

    /// Sets item count and last-modified statistics.
    #[must_use]
    pub fn with_statistics(mut self, item_count: u32, last_modified: Option<DateTime<Utc>>) -> Self {
        self.item_count = item_count;
        self.last_modified = last_modified;
        self
    }

    /// Returns the list item identifier.
    #[must_use]
    pub fn item_id(&self) -> FolderItemId {
        self.item_id
    }

    /// Returns the folder name (the employee display name).
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the server-relative path.
    #[must_use]
    pub fn server_relative_url(&self) -> &str {
        self.server_relative_url.as_str()
    }

    /// Returns the bound employee principal, if metadata was stamped.
    #[must_use]
    pub fn employee_id(&self) -> Option<PrincipalId> {
        self.employee_id
    }

    /// Returns the employee account name, if it was resolved.
    #[must_use]
    pub fn employee_account_name(&self) -> Option<&str> {
        self.employee_account_name.as_deref()
    }

    /// Returns the number of items held by the folder.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.item_count
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }
}

/// File stored in a salary folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDocument {
    /// List item identifier.
    pub item_id: FolderItemId,
    /// File name.
    pub name: String,
    /// Server-relative path.
    pub server_relative_url: String,
}

/// File content to add to a salary folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Target file name.
    pub file_name: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

/// What a caller may do inside one salary folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryFolderPermissions {
    /// Caller may list and open documents.
    pub can_read_files: bool,
    /// Caller may upload documents.
    pub can_add_files: bool,
}
