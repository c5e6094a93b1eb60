//! Hand-written platform fake shared by service tests.

use async_trait::async_trait;
use salary_folders_core::{AppError, AppResult, LoginName};
use salary_folders_domain::{
    FolderItemId, NewDocument, Principal, PrincipalId, RoleAssignment, SalaryDocument,
    SalaryFolder,
};
use tokio::sync::Mutex;

use crate::{DocumentLibrary, LibrarySettings, PrincipalDirectory, UserMemberships};

pub(crate) const LIBRARY: &str = "Salaries";
pub(crate) const GROUP: &str = "Payroll Officers";

pub(crate) fn settings() -> LibrarySettings {
    let Ok(settings) = LibrarySettings::new(LIBRARY, GROUP) else {
        panic!("test settings should be valid");
    };
    settings
}

pub(crate) fn login(value: &str) -> LoginName {
    let Ok(login) = LoginName::new(value) else {
        panic!("test login name should be valid");
    };
    login
}

pub(crate) fn principal_id(value: i64) -> PrincipalId {
    let Ok(id) = PrincipalId::new(value) else {
        panic!("test principal id should be positive");
    };
    id
}

pub(crate) fn item_id(value: i64) -> FolderItemId {
    let Ok(id) = FolderItemId::new(value) else {
        panic!("test item id should be positive");
    };
    id
}

/// Platform operations observed by the fake, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlatformCall {
    FindUserWithGroups(String),
    FindGroup(String),
    EnsureUser(String),
    CreateFolder { library: String, name: String },
    BreakInheritance { item_id: FolderItemId, copy: bool },
    AddRoleAssignment { item_id: FolderItemId, assignment: RoleAssignment },
    SetEmployeeBinding { item_id: FolderItemId, employee_id: PrincipalId },
    ListRootFolders,
    ListSiteUsers,
    ListDocuments(FolderItemId),
    AddDocument { folder_id: FolderItemId, file_name: String },
    IsSiteAdmin(String),
}

/// Steps that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FakeStep {
    FindGroup,
    EnsureUser,
    CreateFolder,
    BreakInheritance,
    AddRoleAssignment,
    SetEmployeeBinding,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<PlatformCall>,
    materialized: Vec<Principal>,
    folders: Vec<SalaryFolder>,
    documents: Vec<(FolderItemId, SalaryDocument)>,
    next_item_id: i64,
}

#[derive(Default)]
pub(crate) struct FakePlatform {
    users: Vec<(Principal, Vec<String>)>,
    identity_provider_accounts: Vec<(String, String)>,
    groups: Vec<Principal>,
    site_admins: Vec<String>,
    user_lookup_failure: Option<AppError>,
    failure: Option<(FakeStep, AppError)>,
    next_principal_id: i64,
    state: Mutex<FakeState>,
}

impl FakePlatform {
    fn allocate_principal_id(&mut self) -> PrincipalId {
        self.next_principal_id += 1;
        principal_id(10 + self.next_principal_id)
    }

    pub(crate) fn with_user_groups(mut self, account: &str, groups: &[&str]) -> Self {
        let id = self.allocate_principal_id();
        let user = Principal::user(id, login(account).claims(), account);
        self.users
            .push((user, groups.iter().map(|group| (*group).to_owned()).collect()));
        self
    }

    pub(crate) fn with_named_user(mut self, account: &str, title: &str) -> Self {
        let id = self.allocate_principal_id();
        self.users
            .push((Principal::user(id, login(account).claims(), title), Vec::new()));
        self
    }

    pub(crate) fn with_identity_provider_account(mut self, account: &str, title: &str) -> Self {
        self.identity_provider_accounts
            .push((account.to_owned(), title.to_owned()));
        self
    }

    pub(crate) fn with_group(mut self, name: &str) -> Self {
        let id = self.allocate_principal_id();
        self.groups.push(Principal::group(id, name, name));
        self
    }

    pub(crate) fn with_site_admin(mut self, account: &str) -> Self {
        self.site_admins.push(login(account).claims());
        self
    }

    pub(crate) fn with_folder(mut self, folder: SalaryFolder) -> Self {
        let state = self.state.get_mut();
        state.next_item_id = state.next_item_id.max(folder.item_id().as_i64());
        state.folders.push(folder);
        self
    }

    pub(crate) fn failing_user_lookups(mut self, error: AppError) -> Self {
        self.user_lookup_failure = Some(error);
        self
    }

    pub(crate) fn failing_at(mut self, step: FakeStep, error: AppError) -> Self {
        self.failure = Some((step, error));
        self
    }

    pub(crate) fn user(&self, account: &str) -> Option<Principal> {
        let claims = login(account).claims();
        self.users
            .iter()
            .find(|(user, _)| user.login_name() == claims)
            .map(|(user, _)| user.clone())
    }

    pub(crate) fn group(&self, name: &str) -> Option<Principal> {
        self.groups.iter().find(|group| group.title() == name).cloned()
    }

    pub(crate) async fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().await.calls.clone()
    }

    pub(crate) async fn folders(&self) -> Vec<SalaryFolder> {
        self.state.lock().await.folders.clone()
    }

    async fn record(&self, call: PlatformCall) {
        self.state.lock().await.calls.push(call);
    }

    fn fail_if(&self, step: FakeStep) -> AppResult<()> {
        match &self.failure {
            Some((failing, error)) if *failing == step => Err(error.clone()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PrincipalDirectory for FakePlatform {
    async fn find_user_with_groups(&self, login_name: &LoginName) -> AppResult<UserMemberships> {
        self.record(PlatformCall::FindUserWithGroups(login_name.claims()))
            .await;
        if let Some(error) = &self.user_lookup_failure {
            return Err(error.clone());
        }

        self.users
            .iter()
            .find(|(user, _)| user.matches_login(login_name))
            .map(|(user, groups)| UserMemberships {
                user: user.clone(),
                group_titles: groups.clone(),
            })
            .ok_or_else(|| AppError::NotFound(format!("user '{login_name}' not found")))
    }

    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Principal>> {
        self.record(PlatformCall::FindGroup(name.to_owned())).await;
        self.fail_if(FakeStep::FindGroup)?;

        Ok(self.group(name))
    }

    async fn ensure_user(&self, login_name: &LoginName) -> AppResult<Principal> {
        self.record(PlatformCall::EnsureUser(login_name.claims())).await;
        self.fail_if(FakeStep::EnsureUser)?;

        if let Some((user, _)) = self
            .users
            .iter()
            .find(|(user, _)| user.matches_login(login_name))
        {
            return Ok(user.clone());
        }

        let mut state = self.state.lock().await;
        if let Some(user) = state
            .materialized
            .iter()
            .find(|user| user.matches_login(login_name))
        {
            return Ok(user.clone());
        }

        let (_, title) = self
            .identity_provider_accounts
            .iter()
            .find(|(account, _)| account == login_name.account_name())
            .ok_or_else(|| {
                AppError::NotFound(format!("The specified user {login_name} could not be found."))
            })?;
        let id = principal_id(500 + i64::try_from(state.materialized.len()).unwrap_or(0));
        let user = Principal::user(id, login_name.claims(), title.as_str());
        state.materialized.push(user.clone());

        Ok(user)
    }

    async fn list_site_users(&self) -> AppResult<Vec<Principal>> {
        self.record(PlatformCall::ListSiteUsers).await;
        let state = self.state.lock().await;

        Ok(self
            .users
            .iter()
            .map(|(user, _)| user.clone())
            .chain(state.materialized.iter().cloned())
            .collect())
    }

    async fn is_site_admin(&self, login_name: &LoginName) -> AppResult<bool> {
        self.record(PlatformCall::IsSiteAdmin(login_name.claims())).await;
        if let Some(error) = &self.user_lookup_failure {
            return Err(error.clone());
        }

        Ok(self.site_admins.contains(&login_name.claims()))
    }
}

#[async_trait]
impl DocumentLibrary for FakePlatform {
    async fn create_folder(&self, library: &str, name: &str) -> AppResult<SalaryFolder> {
        self.record(PlatformCall::CreateFolder {
            library: library.to_owned(),
            name: name.to_owned(),
        })
        .await;
        self.fail_if(FakeStep::CreateFolder)?;

        let mut state = self.state.lock().await;
        if state.folders.iter().any(|folder| folder.name() == name) {
            return Err(AppError::Conflict(format!(
                "A file or folder with the name {name} already exists."
            )));
        }

        state.next_item_id += 1;
        let folder = SalaryFolder::new(
            item_id(state.next_item_id),
            name,
            format!("/sites/hr/{library}/{name}"),
        );
        state.folders.push(folder.clone());

        Ok(folder)
    }

    async fn break_role_inheritance(
        &self,
        _library: &str,
        item_id: FolderItemId,
        copy_role_assignments: bool,
    ) -> AppResult<()> {
        self.record(PlatformCall::BreakInheritance {
            item_id,
            copy: copy_role_assignments,
        })
        .await;
        self.fail_if(FakeStep::BreakInheritance)
    }

    async fn add_role_assignment(
        &self,
        _library: &str,
        item_id: FolderItemId,
        assignment: RoleAssignment,
    ) -> AppResult<()> {
        self.record(PlatformCall::AddRoleAssignment {
            item_id,
            assignment,
        })
        .await;
        self.fail_if(FakeStep::AddRoleAssignment)
    }

    async fn set_employee_binding(
        &self,
        _library: &str,
        item_id: FolderItemId,
        employee_id: PrincipalId,
    ) -> AppResult<()> {
        self.record(PlatformCall::SetEmployeeBinding {
            item_id,
            employee_id,
        })
        .await;
        self.fail_if(FakeStep::SetEmployeeBinding)?;

        let mut state = self.state.lock().await;
        if let Some(folder) = state
            .folders
            .iter_mut()
            .find(|folder| folder.item_id() == item_id)
        {
            *folder = folder.clone().with_employee_id(Some(employee_id));
        }

        Ok(())
    }

    async fn list_root_folders(&self, _library: &str) -> AppResult<Vec<SalaryFolder>> {
        self.record(PlatformCall::ListRootFolders).await;
        Ok(self.state.lock().await.folders.clone())
    }

    async fn list_folder_documents(
        &self,
        _library: &str,
        folder_id: FolderItemId,
    ) -> AppResult<Vec<SalaryDocument>> {
        self.record(PlatformCall::ListDocuments(folder_id)).await;

        Ok(self
            .state
            .lock()
            .await
            .documents
            .iter()
            .filter(|(owner, _)| *owner == folder_id)
            .map(|(_, document)| document.clone())
            .collect())
    }

    async fn add_document(
        &self,
        library: &str,
        folder_id: FolderItemId,
        document: NewDocument,
    ) -> AppResult<SalaryDocument> {
        self.record(PlatformCall::AddDocument {
            folder_id,
            file_name: document.file_name.clone(),
        })
        .await;

        let mut state = self.state.lock().await;
        state.next_item_id += 1;
        let created = SalaryDocument {
            item_id: item_id(state.next_item_id),
            name: document.file_name.clone(),
            server_relative_url: format!("/sites/hr/{library}/{}", document.file_name),
        };
        state.documents.push((folder_id, created.clone()));

        Ok(created)
    }
}
