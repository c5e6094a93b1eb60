use salary_folders_application::LibrarySettings;
use salary_folders_domain::{PermissionLevel, SYSTEM_FORMS_FOLDER};

use super::*;

const MEMBERS_GROUP: &str = "HR Members";

const SAMPLE_EMPLOYEES: &[(&str, &str)] = &[
    ("yannick.plenevaux@contoso.com", "Yannick Plenevaux"),
    ("christopher.clement@contoso.com", "Christopher Clément"),
    ("antoine.pichot@contoso.com", "Antoine Pichot"),
    ("stephane.mertz@contoso.com", "Stéphane Mertz"),
];

const SAMPLE_DOCUMENTS: &[&str] = &[
    "Document 1.docx",
    "Document 2.docx",
    "Payslip 2026-08.pdf",
    "Payslip 2026-09.pdf",
    "Contract amendment.docx",
];

const UNMATERIALIZED_ACCOUNTS: &[(&str, &str)] = &[
    ("nora.newman@contoso.com", "Nora Newman"),
    ("lucas.martin@contoso.com", "Lucas Martin"),
];

/// Account of the seeded payroll officer.
pub const SAMPLE_PAYROLL_OFFICER: &str = "payroll.officer@contoso.com";

/// Account of the seeded site collection administrator.
pub const SAMPLE_SITE_ADMIN: &str = "site.admin@contoso.com";

impl InMemoryContentPlatform {
    /// Creates a platform seeded with fixed sample data: the payroll officers
    /// group, one officer, one site admin, four employees with provisioned
    /// salary folders and documents, and two identity provider accounts that
    /// are not yet site users.
    pub fn with_sample_data(settings: &LibrarySettings) -> AppResult<Self> {
        let mut directory = DirectoryState::default();
        let payroll_group = directory.add_group(settings.payroll_officers_group_name())?;
        let members_group = directory.add_group(MEMBERS_GROUP)?;

        directory.add_user(
            SAMPLE_PAYROLL_OFFICER,
            "Paula Roll",
            &[settings.payroll_officers_group_name(), MEMBERS_GROUP],
            false,
        )?;
        directory.add_user(SAMPLE_SITE_ADMIN, "Sam Admin", &[], true)?;
        for (account, title) in UNMATERIALIZED_ACCOUNTS {
            directory
                .identity_provider_accounts
                .insert((*account).to_owned(), (*title).to_owned());
        }

        let mut library = LibraryState::new(
            format!("/sites/hr/{}", settings.library_name()).as_str(),
            vec![RoleAssignment::new(
                members_group.id(),
                PermissionLevel::Contribute,
            )],
        );
        library.insert_item(ItemKind::Folder, None, SYSTEM_FORMS_FOLDER)?;

        for (account, title) in SAMPLE_EMPLOYEES {
            let employee = directory.add_user(account, title, &[MEMBERS_GROUP], false)?;
            let folder_id = library.insert_item(ItemKind::Folder, None, title)?;
            for document in SAMPLE_DOCUMENTS {
                let document_id = library.insert_item(ItemKind::File, Some(folder_id), document)?;
                library.item_mut(document_id)?.employee_id = Some(employee.id());
            }

            let folder = library.item_mut(folder_id)?;
            folder.employee_id = Some(employee.id());
            folder.inherits_permissions = false;
            folder.role_assignments = vec![
                RoleAssignment::new(employee.id(), PermissionLevel::Read),
                RoleAssignment::new(payroll_group.id(), PermissionLevel::Contribute),
            ];
        }

        let mut libraries = BTreeMap::new();
        libraries.insert(settings.library_name().to_owned(), library);

        Ok(Self {
            directory: RwLock::new(directory),
            libraries: RwLock::new(libraries),
        })
    }
}
