use super::*;

impl LibraryState {
    pub(super) fn new(server_relative_url: &str, default_assignments: Vec<RoleAssignment>) -> Self {
        Self {
            server_relative_url: server_relative_url.trim_end_matches('/').to_owned(),
            default_assignments,
            items: BTreeMap::new(),
            next_item_id: 0,
        }
    }

    pub(super) fn insert_item(
        &mut self,
        kind: ItemKind,
        parent: Option<FolderItemId>,
        name: &str,
    ) -> AppResult<FolderItemId> {
        let parent_url = match parent {
            Some(parent_id) => self
                .items
                .get(&parent_id)
                .filter(|item| item.kind == ItemKind::Folder)
                .map(|item| item.server_relative_url.clone())
                .ok_or_else(|| missing_item(parent_id))?,
            None => self.server_relative_url.clone(),
        };

        self.next_item_id += 1;
        let item_id = FolderItemId::new(self.next_item_id)?;
        self.items.insert(
            item_id,
            StoredItem {
                kind,
                parent,
                name: name.to_owned(),
                server_relative_url: format!("{parent_url}/{name}"),
                employee_id: None,
                inherits_permissions: true,
                role_assignments: Vec::new(),
                modified: Utc::now(),
            },
        );

        Ok(item_id)
    }

    fn child_named(&self, parent: Option<FolderItemId>, name: &str) -> Option<FolderItemId> {
        self.items
            .iter()
            .find(|(_, item)| item.parent == parent && item.name.eq_ignore_ascii_case(name))
            .map(|(item_id, _)| *item_id)
    }

    pub(super) fn folder(&self, item_id: FolderItemId) -> SalaryFolder {
        let Some(item) = self.items.get(&item_id) else {
            return SalaryFolder::new(item_id, "", "");
        };
        let children: Vec<&StoredItem> = self
            .items
            .values()
            .filter(|child| child.parent == Some(item_id))
            .collect();
        let last_modified = children
            .iter()
            .map(|child| child.modified)
            .chain(std::iter::once(item.modified))
            .max();

        SalaryFolder::new(item_id, item.name.as_str(), item.server_relative_url.as_str())
            .with_employee_id(item.employee_id)
            .with_statistics(u32::try_from(children.len()).unwrap_or(u32::MAX), last_modified)
    }

    pub(super) fn item_mut(&mut self, item_id: FolderItemId) -> AppResult<&mut StoredItem> {
        self.items.get_mut(&item_id).ok_or_else(|| missing_item(item_id))
    }
}

impl InMemoryContentPlatform {
    pub(super) async fn create_folder_impl(
        &self,
        library: &str,
        name: &str,
    ) -> AppResult<SalaryFolder> {
        let mut libraries = self.libraries.write().await;
        let state = libraries
            .get_mut(library)
            .ok_or_else(|| missing_library(library))?;

        if state.child_named(None, name).is_some() {
            return Err(AppError::Conflict(format!(
                "A file or folder with the name {}/{name} already exists.",
                state.server_relative_url
            )));
        }

        let item_id = state.insert_item(ItemKind::Folder, None, name)?;
        Ok(state.folder(item_id))
    }

    pub(super) async fn break_role_inheritance_impl(
        &self,
        library: &str,
        item_id: FolderItemId,
        copy_role_assignments: bool,
    ) -> AppResult<()> {
        let mut libraries = self.libraries.write().await;
        let state = libraries
            .get_mut(library)
            .ok_or_else(|| missing_library(library))?;
        let inherited = state.default_assignments.clone();
        let item = state.item_mut(item_id)?;

        if item.inherits_permissions {
            item.inherits_permissions = false;
            item.role_assignments = if copy_role_assignments {
                inherited
            } else {
                Vec::new()
            };
        }

        Ok(())
    }

    pub(super) async fn add_role_assignment_impl(
        &self,
        library: &str,
        item_id: FolderItemId,
        assignment: RoleAssignment,
    ) -> AppResult<()> {
        let known_principal = {
            let directory = self.directory.read().await;
            directory
                .users
                .iter()
                .map(|user| user.principal.id())
                .chain(directory.groups.iter().map(Principal::id))
                .any(|id| id == assignment.principal_id)
        };
        if !known_principal {
            return Err(AppError::NotFound(format!(
                "principal {} does not exist",
                assignment.principal_id
            )));
        }

        let mut libraries = self.libraries.write().await;
        let state = libraries
            .get_mut(library)
            .ok_or_else(|| missing_library(library))?;
        let item = state.item_mut(item_id)?;

        if item.inherits_permissions {
            return Err(AppError::Validation(format!(
                "item {item_id} inherits permissions; break role inheritance before adding assignments"
            )));
        }

        if !item.role_assignments.contains(&assignment) {
            item.role_assignments.push(assignment);
        }

        Ok(())
    }

    pub(super) async fn set_employee_binding_impl(
        &self,
        library: &str,
        item_id: FolderItemId,
        employee_id: PrincipalId,
    ) -> AppResult<()> {
        let mut libraries = self.libraries.write().await;
        let state = libraries
            .get_mut(library)
            .ok_or_else(|| missing_library(library))?;
        let item = state.item_mut(item_id)?;
        item.employee_id = Some(employee_id);
        item.modified = Utc::now();

        Ok(())
    }

    pub(super) async fn list_root_folders_impl(&self, library: &str) -> AppResult<Vec<SalaryFolder>> {
        let libraries = self.libraries.read().await;
        let state = libraries.get(library).ok_or_else(|| missing_library(library))?;

        Ok(state
            .items
            .iter()
            .filter(|(_, item)| item.kind == ItemKind::Folder && item.parent.is_none())
            .map(|(item_id, _)| state.folder(*item_id))
            .collect())
    }

    pub(super) async fn list_folder_documents_impl(
        &self,
        library: &str,
        folder_id: FolderItemId,
    ) -> AppResult<Vec<SalaryDocument>> {
        let libraries = self.libraries.read().await;
        let state = libraries.get(library).ok_or_else(|| missing_library(library))?;
        if !state.items.contains_key(&folder_id) {
            return Err(missing_item(folder_id));
        }

        Ok(state
            .items
            .iter()
            .filter(|(_, item)| item.kind == ItemKind::File && item.parent == Some(folder_id))
            .map(|(item_id, item)| SalaryDocument {
                item_id: *item_id,
                name: item.name.clone(),
                server_relative_url: item.server_relative_url.clone(),
            })
            .collect())
    }

    pub(super) async fn add_document_impl(
        &self,
        library: &str,
        folder_id: FolderItemId,
        document: NewDocument,
    ) -> AppResult<SalaryDocument> {
        let mut libraries = self.libraries.write().await;
        let state = libraries
            .get_mut(library)
            .ok_or_else(|| missing_library(library))?;

        let item_id = match state.child_named(Some(folder_id), document.file_name.as_str()) {
            Some(existing) => {
                let item = state.item_mut(existing)?;
                if item.kind != ItemKind::File {
                    return Err(AppError::Conflict(format!(
                        "a folder named '{}' already exists",
                        document.file_name
                    )));
                }
                item.modified = Utc::now();
                existing
            }
            None => state.insert_item(ItemKind::File, Some(folder_id), document.file_name.as_str())?,
        };

        let item = state.items.get(&item_id).ok_or_else(|| missing_item(item_id))?;
        Ok(SalaryDocument {
            item_id,
            name: item.name.clone(),
            server_relative_url: item.server_relative_url.clone(),
        })
    }
}
