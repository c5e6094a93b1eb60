use async_trait::async_trait;
use salary_folders_core::AppResult;
use salary_folders_domain::{
    FolderItemId, NewDocument, PrincipalId, RoleAssignment, SalaryDocument, SalaryFolder,
};

/// Port for folder, file and permission operations on a document library.
///
/// Every method takes the library title so one adapter can serve any library.
#[async_trait]
pub trait DocumentLibrary: Send + Sync {
    /// Creates a folder at the library root.
    ///
    /// A name collision is reported by the platform and surfaced as-is.
    async fn create_folder(&self, library: &str, name: &str) -> AppResult<SalaryFolder>;

    /// Severs permission inheritance on an item.
    async fn break_role_inheritance(
        &self,
        library: &str,
        item_id: FolderItemId,
        copy_role_assignments: bool,
    ) -> AppResult<()>;

    /// Adds one explicit role assignment on an item.
    async fn add_role_assignment(
        &self,
        library: &str,
        item_id: FolderItemId,
        assignment: RoleAssignment,
    ) -> AppResult<()>;

    /// Stamps the `EmployeeId` metadata field of an item.
    async fn set_employee_binding(
        &self,
        library: &str,
        item_id: FolderItemId,
        employee_id: PrincipalId,
    ) -> AppResult<()>;

    /// Lists folders at the library root.
    async fn list_root_folders(&self, library: &str) -> AppResult<Vec<SalaryFolder>>;

    /// Lists the files of a folder.
    async fn list_folder_documents(
        &self,
        library: &str,
        folder_id: FolderItemId,
    ) -> AppResult<Vec<SalaryDocument>>;

    /// Adds a file to a folder, overwriting any file with the same name.
    async fn add_document(
        &self,
        library: &str,
        folder_id: FolderItemId,
        document: NewDocument,
    ) -> AppResult<SalaryDocument>;
}
