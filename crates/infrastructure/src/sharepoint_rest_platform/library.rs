use reqwest::header::HeaderValue;
use salary_folders_domain::EMPLOYEE_ID_FIELD;

use super::odata::{Collection, FileRecord, FolderRecord, ListItemRecord, quote_literal};

use super::*;

const FOLDER_FIELDS: &str =
    "Name,ServerRelativeUrl,ItemCount,TimeLastModified,ListItemAllFields/Id,ListItemAllFields/EmployeeId";
const FILE_FIELDS: &str = "Name,ServerRelativeUrl,ListItemAllFields/Id";

fn list_path(suffix: &str) -> String {
    format!("web/lists/getByTitle(@list)/{suffix}")
}

fn list_param(library: &str) -> (&'static str, String) {
    ("@list", quote_literal(library))
}

impl SharePointRestPlatform {
    async fn list_item_id(&self, path: &str, alias: (&str, String)) -> AppResult<FolderItemId> {
        let url = self.api_url(path, &[alias, ("$select", "Id".to_owned())])?;
        let fields: ListItemRecord = self.get_json(url).await?;

        fields
            .id
            .map(FolderItemId::new)
            .transpose()?
            .ok_or_else(|| AppError::Upstream(format!("'{path}' returned no list item id")))
    }

    pub(super) async fn create_folder_impl(
        &self,
        library: &str,
        name: &str,
    ) -> AppResult<SalaryFolder> {
        let url = self.api_url(
            list_path("rootFolder/folders/addUsingPath(DecodedUrl=@name,overwrite=false)")
                .as_str(),
            &[list_param(library), ("@name", quote_literal(name))],
        )?;
        let record: FolderRecord = self.post_json(url, None).await?;

        let item_id = self
            .list_item_id(
                "web/getFolderByServerRelativeUrl(@path)/ListItemAllFields",
                ("@path", quote_literal(record.server_relative_url.as_str())),
            )
            .await?;

        Ok(SalaryFolder::new(
            item_id,
            record.name,
            record.server_relative_url,
        ))
    }

    pub(super) async fn break_role_inheritance_impl(
        &self,
        library: &str,
        item_id: FolderItemId,
        copy_role_assignments: bool,
    ) -> AppResult<()> {
        let url = self.api_url(
            list_path(
                format!(
                    "items({item_id})/breakroleinheritance(copyRoleAssignments={copy_role_assignments},clearSubscopes=true)"
                )
                .as_str(),
            )
            .as_str(),
            &[list_param(library)],
        )?;

        self.post(url, None).await
    }

    pub(super) async fn add_role_assignment_impl(
        &self,
        library: &str,
        item_id: FolderItemId,
        assignment: RoleAssignment,
    ) -> AppResult<()> {
        let url = self.api_url(
            list_path(
                format!(
                    "items({item_id})/roleassignments/addroleassignment(principalid={},roledefid={})",
                    assignment.principal_id,
                    assignment.level.role_definition_id()
                )
                .as_str(),
            )
            .as_str(),
            &[list_param(library)],
        )?;

        self.post(url, None).await
    }

    pub(super) async fn set_employee_binding_impl(
        &self,
        library: &str,
        item_id: FolderItemId,
        employee_id: PrincipalId,
    ) -> AppResult<()> {
        let url = self.api_url(
            list_path(format!("items({item_id})").as_str()).as_str(),
            &[list_param(library)],
        )?;

        let mut fields = serde_json::Map::new();
        fields.insert(
            EMPLOYEE_ID_FIELD.to_owned(),
            Value::from(employee_id.as_i64()),
        );
        let body = Value::Object(fields);

        let request = self
            .post_request(url, Some(&body))
            .header("X-HTTP-Method", HeaderValue::from_static("MERGE"))
            .header("IF-MATCH", HeaderValue::from_static("*"));
        self.send(request).await?;

        Ok(())
    }

    pub(super) async fn list_root_folders_impl(&self, library: &str) -> AppResult<Vec<SalaryFolder>> {
        let url = self.api_url(
            list_path("rootFolder/folders").as_str(),
            &[
                list_param(library),
                ("$select", FOLDER_FIELDS.to_owned()),
                ("$expand", "ListItemAllFields".to_owned()),
                ("$orderby", "Name".to_owned()),
            ],
        )?;
        let folders: Collection<FolderRecord> = self.get_json(url).await?;

        let mut mapped = Vec::with_capacity(folders.value.len());
        for record in folders.value {
            if let Some(folder) = record.into_folder()? {
                mapped.push(folder);
            }
        }

        Ok(mapped)
    }

    pub(super) async fn list_folder_documents_impl(
        &self,
        library: &str,
        folder_id: FolderItemId,
    ) -> AppResult<Vec<SalaryDocument>> {
        let url = self.api_url(
            list_path(format!("items({folder_id})/folder/files").as_str()).as_str(),
            &[
                list_param(library),
                ("$select", FILE_FIELDS.to_owned()),
                ("$expand", "ListItemAllFields".to_owned()),
            ],
        )?;
        let files: Collection<FileRecord> = self.get_json(url).await?;

        files.value.into_iter().map(FileRecord::into_document).collect()
    }

    pub(super) async fn add_document_impl(
        &self,
        library: &str,
        folder_id: FolderItemId,
        document: NewDocument,
    ) -> AppResult<SalaryDocument> {
        let url = self.api_url(
            list_path(format!("items({folder_id})/folder/files/add(overwrite=true,url=@file)").as_str())
                .as_str(),
            &[
                list_param(library),
                ("@file", quote_literal(document.file_name.as_str())),
            ],
        )?;

        let request = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(document.content);
        let record: FileRecord = read_json(self.send(request).await?).await?;

        let item_id = self
            .list_item_id(
                "web/getFileByServerRelativeUrl(@path)/ListItemAllFields",
                ("@path", quote_literal(record.server_relative_url.as_str())),
            )
            .await?;

        Ok(SalaryDocument {
            item_id,
            name: record.name,
            server_relative_url: record.server_relative_url,
        })
    }
}
