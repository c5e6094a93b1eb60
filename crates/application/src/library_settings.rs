use salary_folders_core::{AppResult, NonEmptyString};

/// Names of the platform objects the salary workflows operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySettings {
    library_name: NonEmptyString,
    payroll_officers_group_name: NonEmptyString,
}

impl LibrarySettings {
    /// Creates validated settings.
    pub fn new(
        library_name: impl Into<String>,
        payroll_officers_group_name: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            library_name: NonEmptyString::new(library_name)?,
            payroll_officers_group_name: NonEmptyString::new(payroll_officers_group_name)?,
        })
    }

    /// Returns the salaries document library title.
    #[must_use]
    pub fn library_name(&self) -> &str {
        self.library_name.as_str()
    }

    /// Returns the privileged group display name.
    #[must_use]
    pub fn payroll_officers_group_name(&self) -> &str {
        self.payroll_officers_group_name.as_str()
    }
}
