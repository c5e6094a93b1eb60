use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use salary_folders_application::{DocumentLibrary, PrincipalDirectory, UserMemberships};
use salary_folders_core::{AppError, AppResult, LoginName};
use salary_folders_domain::{
    FolderItemId, NewDocument, Principal, PrincipalId, RoleAssignment, SalaryDocument,
    SalaryFolder,
};
use tokio::sync::RwLock;

mod directory;
mod library;
mod seed;

pub use seed::{SAMPLE_PAYROLL_OFFICER, SAMPLE_SITE_ADMIN};


/// In-memory content platform used for local development and tests.
///
/// Mirrors the platform behaviors the salary workflows depend on: ensure
/// semantics for users, duplicate folder names rejected with a conflict, and
/// explicit grants refused while an item still inherits permissions.
#[derive(Debug, Default)]
pub struct InMemoryContentPlatform {
    directory: RwLock<DirectoryState>,
    libraries: RwLock<BTreeMap<String, LibraryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: Vec<StoredUser>,
    groups: Vec<Principal>,
    identity_provider_accounts: BTreeMap<String, String>,
    next_principal_id: i64,
}

#[derive(Debug, Clone)]
struct StoredUser {
    principal: Principal,
    group_ids: Vec<PrincipalId>,
    is_site_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKind {
    Folder,
    File,
}

#[derive(Debug, Clone)]
struct StoredItem {
    kind: ItemKind,
    parent: Option<FolderItemId>,
    name: String,
    server_relative_url: String,
    employee_id: Option<PrincipalId>,
    inherits_permissions: bool,
    role_assignments: Vec<RoleAssignment>,
    modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct LibraryState {
    server_relative_url: String,
    default_assignments: Vec<RoleAssignment>,
    items: BTreeMap<FolderItemId, StoredItem>,
    next_item_id: i64,
}

impl InMemoryContentPlatform {
    /// Creates an empty platform with no users, groups or libraries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a document library whose items inherit the given grants.
    pub async fn register_library(
        &self,
        title: &str,
        server_relative_url: &str,
        default_assignments: Vec<RoleAssignment>,
    ) {
        self.libraries.write().await.insert(
            title.to_owned(),
            LibraryState::new(server_relative_url, default_assignments),
        );
    }

    /// Registers a site group and returns its principal.
    pub async fn register_group(&self, title: &str) -> AppResult<Principal> {
        self.directory.write().await.add_group(title)
    }

    /// Registers a site user that belongs to the named groups.
    pub async fn register_user(
        &self,
        account: &str,
        title: &str,
        group_titles: &[&str],
    ) -> AppResult<Principal> {
        self.directory
            .write()
            .await
            .add_user(account, title, group_titles, false)
    }

    /// Registers an account known to the identity provider but not yet
    /// materialized as a site user.
    pub async fn register_identity_provider_account(&self, account: &str, title: &str) {
        self.directory
            .write()
            .await
            .identity_provider_accounts
            .insert(account.to_owned(), title.to_owned());
    }

    /// Returns explicit or inherited grants of an item.
    pub async fn role_assignments(
        &self,
        library: &str,
        item_id: FolderItemId,
    ) -> Option<Vec<RoleAssignment>> {
        let libraries = self.libraries.read().await;
        let state = libraries.get(library)?;
        let item = state.items.get(&item_id)?;

        Some(if item.inherits_permissions {
            state.default_assignments.clone()
        } else {
            item.role_assignments.clone()
        })
    }

    /// Returns whether an item still inherits its parent's permissions.
    pub async fn inherits_permissions(&self, library: &str, item_id: FolderItemId) -> Option<bool> {
        let libraries = self.libraries.read().await;
        libraries
            .get(library)?
            .items
            .get(&item_id)
            .map(|item| item.inherits_permissions)
    }

    /// Finds a root folder by name.
    pub async fn folder_by_name(&self, library: &str, name: &str) -> Option<SalaryFolder> {
        let libraries = self.libraries.read().await;
        let state = libraries.get(library)?;
        state
            .items
            .iter()
            .find(|(_, item)| {
                item.kind == ItemKind::Folder && item.parent.is_none() && item.name == name
            })
            .map(|(item_id, _)| state.folder(*item_id))
    }

    /// Returns the `EmployeeId` binding of any item.
    pub async fn employee_binding(
        &self,
        library: &str,
        item_id: FolderItemId,
    ) -> Option<PrincipalId> {
        let libraries = self.libraries.read().await;
        libraries.get(library)?.items.get(&item_id)?.employee_id
    }
}

#[async_trait]
impl PrincipalDirectory for InMemoryContentPlatform {
    async fn find_user_with_groups(&self, login_name: &LoginName) -> AppResult<UserMemberships> {
        self.find_user_with_groups_impl(login_name).await
    }

    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Principal>> {
        self.find_group_by_name_impl(name).await
    }

    async fn ensure_user(&self, login_name: &LoginName) -> AppResult<Principal> {
        self.ensure_user_impl(login_name).await
    }

    async fn list_site_users(&self) -> AppResult<Vec<Principal>> {
        self.list_site_users_impl().await
    }

    async fn is_site_admin(&self, login_name: &LoginName) -> AppResult<bool> {
        self.is_site_admin_impl(login_name).await
    }
}

#[async_trait]
impl DocumentLibrary for InMemoryContentPlatform {
    async fn create_folder(&self, library: &str, name: &str) -> AppResult<SalaryFolder> {
        self.create_folder_impl(library, name).await
    }

    async fn break_role_inheritance(
        &self,
        library: &str,
        item_id: FolderItemId,
        copy_role_assignments: bool,
    ) -> AppResult<()> {
        self.break_role_inheritance_impl(library, item_id, copy_role_assignments)
            .await
    }

    async fn add_role_assignment(
        &self,
        library: &str,
        item_id: FolderItemId,
        assignment: RoleAssignment,
    ) -> AppResult<()> {
        self.add_role_assignment_impl(library, item_id, assignment)
            .await
    }

    async fn set_employee_binding(
        &self,
        library: &str,
        item_id: FolderItemId,
        employee_id: PrincipalId,
    ) -> AppResult<()> {
        self.set_employee_binding_impl(library, item_id, employee_id)
            .await
    }

    async fn list_root_folders(&self, library: &str) -> AppResult<Vec<SalaryFolder>> {
        self.list_root_folders_impl(library).await
    }

    async fn list_folder_documents(
        &self,
        library: &str,
        folder_id: FolderItemId,
    ) -> AppResult<Vec<SalaryDocument>> {
        self.list_folder_documents_impl(library, folder_id).await
    }

    async fn add_document(
        &self,
        library: &str,
        folder_id: FolderItemId,
        document: NewDocument,
    ) -> AppResult<SalaryDocument> {
        self.add_document_impl(library, folder_id, document).await
    }
}

fn missing_library(library: &str) -> AppError {
    AppError::NotFound(format!("List '{library}' does not exist at site"))
}

fn missing_item(item_id: FolderItemId) -> AppError {
    AppError::NotFound(format!("Item does not exist. It may have been deleted by another user ({item_id})"))
}
