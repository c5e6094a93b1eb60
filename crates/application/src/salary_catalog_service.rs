use std::sync::Arc;

use salary_folders_core::{AppError, AppResult, LoginName, login::account_name_from_login};
use salary_folders_domain::{
    FolderItemId, NewDocument, Principal, SYSTEM_FORMS_FOLDER, SalaryDocument, SalaryFolder,
    SalaryFolderPermissions,
};
use tracing::info;

use crate::{DocumentLibrary, LibrarySettings, PayrollOfficerService, PrincipalDirectory};

/// What the acting identity is allowed to do in the add-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Acting login name.
    pub login_name: LoginName,
    /// Member of the payroll officers group.
    pub is_payroll_officer: bool,
    /// Site collection administrator.
    pub is_site_admin: bool,
}

/// Read side of the salaries library plus document upload.
#[derive(Clone)]
pub struct SalaryCatalogService {
    directory: Arc<dyn PrincipalDirectory>,
    library: Arc<dyn DocumentLibrary>,
    payroll_officers: PayrollOfficerService,
    settings: LibrarySettings,
}

impl SalaryCatalogService {
    /// Creates the catalog service.
    #[must_use]
    pub fn new(
        directory: Arc<dyn PrincipalDirectory>,
        library: Arc<dyn DocumentLibrary>,
        payroll_officers: PayrollOfficerService,
        settings: LibrarySettings,
    ) -> Self {
        Self {
            directory,
            library,
            payroll_officers,
            settings,
        }
    }

    /// Lists salary folders ordered by name, with employee account names.
    pub async fn list_salary_folders(&self) -> AppResult<Vec<SalaryFolder>> {
        let mut folders: Vec<SalaryFolder> = self
            .library
            .list_root_folders(self.settings.library_name())
            .await?
            .into_iter()
            .filter(|folder| folder.name() != SYSTEM_FORMS_FOLDER)
            .collect();
        folders.sort_by(|left, right| left.name().cmp(right.name()));

        let users = self.directory.list_site_users().await?;

        Ok(folders
            .into_iter()
            .map(|folder| {
                let account_name = employee_account_name(&folder, &users);
                folder.with_employee_account_name(account_name)
            })
            .collect())
    }

    /// Lists the documents of one salary folder.
    pub async fn list_folder_documents(
        &self,
        folder_id: FolderItemId,
    ) -> AppResult<Vec<SalaryDocument>> {
        let folder = self.find_folder(folder_id).await?;

        self.library
            .list_folder_documents(self.settings.library_name(), folder.item_id())
            .await
    }

    /// Returns what the acting identity may do inside a folder.
    pub async fn folder_permissions(
        &self,
        acting: &LoginName,
        folder_id: FolderItemId,
    ) -> AppResult<SalaryFolderPermissions> {
        self.find_folder(folder_id).await?;
        let is_payroll_officer = self.payroll_officers.is_payroll_officer(acting).await;

        Ok(SalaryFolderPermissions {
            can_read_files: true,
            can_add_files: is_payroll_officer,
        })
    }

    /// Uploads documents into a folder and binds each one to the folder's
    /// employee. Returns the number of uploaded documents.
    pub async fn upload_documents(
        &self,
        acting: &LoginName,
        folder_id: FolderItemId,
        documents: Vec<NewDocument>,
    ) -> AppResult<usize> {
        if !self.payroll_officers.is_payroll_officer(acting).await {
            return Err(AppError::Forbidden(format!(
                "'{acting}' is not a payroll officer and cannot add documents"
            )));
        }

        let library = self.settings.library_name();
        let folder = self.find_folder(folder_id).await?;
        let mut uploaded = 0_usize;

        for document in documents {
            if document.file_name.trim().is_empty() {
                return Err(AppError::Validation(
                    "document file name must not be empty".to_owned(),
                ));
            }

            let created = self
                .library
                .add_document(library, folder.item_id(), document)
                .await?;

            if let Some(employee_id) = folder.employee_id() {
                self.library
                    .set_employee_binding(library, created.item_id, employee_id)
                    .await?;
            }

            uploaded += 1;
            info!(
                acting = %acting,
                folder = folder.name(),
                document = created.name.as_str(),
                "salary document uploaded"
            );
        }

        Ok(uploaded)
    }

    /// Resolves the caller's roles for the add-in.
    pub async fn caller_context(&self, acting: &LoginName) -> CallerContext {
        CallerContext {
            login_name: acting.clone(),
            is_payroll_officer: self.payroll_officers.is_payroll_officer(acting).await,
            is_site_admin: self.payroll_officers.is_site_admin(acting).await,
        }
    }

    async fn find_folder(&self, folder_id: FolderItemId) -> AppResult<SalaryFolder> {
        self.library
            .list_root_folders(self.settings.library_name())
            .await?
            .into_iter()
            .find(|folder| folder.item_id() == folder_id && folder.name() != SYSTEM_FORMS_FOLDER)
            .ok_or_else(|| AppError::NotFound(format!("salary folder '{folder_id}' does not exist")))
    }
}

fn employee_account_name(folder: &SalaryFolder, users: &[Principal]) -> Option<String> {
    let employee_id = folder.employee_id()?;
    let mut matches = users.iter().filter(|user| user.id() == employee_id);

    match (matches.next(), matches.next()) {
        (Some(user), None) if !user.login_name().is_empty() => {
            Some(account_name_from_login(user.login_name()).to_owned())
        }
        _ => None,
    }
}
