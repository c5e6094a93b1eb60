use super::*;

impl DirectoryState {
    fn allocate_principal_id(&mut self) -> AppResult<PrincipalId> {
        self.next_principal_id += 1;
        PrincipalId::new(self.next_principal_id)
    }

    pub(super) fn add_group(&mut self, title: &str) -> AppResult<Principal> {
        if self.groups.iter().any(|group| group.title() == title) {
            return Err(AppError::Conflict(format!(
                "The specified name is already in use: {title}"
            )));
        }

        let group = Principal::group(self.allocate_principal_id()?, title, title);
        self.groups.push(group.clone());
        Ok(group)
    }

    pub(super) fn add_user(
        &mut self,
        account: &str,
        title: &str,
        group_titles: &[&str],
        is_site_admin: bool,
    ) -> AppResult<Principal> {
        let login_name = LoginName::new(account)?;
        if self.find_user(&login_name).is_some() {
            return Err(AppError::Conflict(format!(
                "user '{login_name}' is already registered"
            )));
        }

        let group_ids = group_titles
            .iter()
            .map(|title| {
                self.groups
                    .iter()
                    .find(|group| group.title() == *title)
                    .map(Principal::id)
                    .ok_or_else(|| AppError::NotFound(format!("Group cannot be found: {title}")))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let principal = Principal::user(self.allocate_principal_id()?, login_name.claims(), title);
        self.users.push(StoredUser {
            principal: principal.clone(),
            group_ids,
            is_site_admin,
        });

        Ok(principal)
    }

    fn find_user(&self, login_name: &LoginName) -> Option<&StoredUser> {
        self.users
            .iter()
            .find(|user| user.principal.matches_login(login_name))
    }
}

impl InMemoryContentPlatform {
    pub(super) async fn find_user_with_groups_impl(
        &self,
        login_name: &LoginName,
    ) -> AppResult<UserMemberships> {
        let directory = self.directory.read().await;
        let user = directory
            .find_user(login_name)
            .ok_or_else(|| AppError::NotFound("User cannot be found.".to_owned()))?;

        let group_titles = user
            .group_ids
            .iter()
            .filter_map(|group_id| {
                directory
                    .groups
                    .iter()
                    .find(|group| group.id() == *group_id)
                    .map(|group| group.title().to_owned())
            })
            .collect();

        Ok(UserMemberships {
            user: user.principal.clone(),
            group_titles,
        })
    }

    pub(super) async fn find_group_by_name_impl(&self, name: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .directory
            .read()
            .await
            .groups
            .iter()
            .find(|group| group.title() == name)
            .cloned())
    }

    pub(super) async fn ensure_user_impl(&self, login_name: &LoginName) -> AppResult<Principal> {
        let mut directory = self.directory.write().await;
        if let Some(user) = directory.find_user(login_name) {
            return Ok(user.principal.clone());
        }

        let title = directory
            .identity_provider_accounts
            .get(login_name.account_name())
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "The specified user {} could not be found.",
                    login_name.claims()
                ))
            })?;

        directory.add_user(login_name.account_name(), title.as_str(), &[], false)
    }

    pub(super) async fn list_site_users_impl(&self) -> AppResult<Vec<Principal>> {
        Ok(self
            .directory
            .read()
            .await
            .users
            .iter()
            .map(|user| user.principal.clone())
            .collect())
    }

    pub(super) async fn is_site_admin_impl(&self, login_name: &LoginName) -> AppResult<bool> {
        let directory = self.directory.read().await;
        let user = directory
            .find_user(login_name)
            .ok_or_else(|| AppError::NotFound("User cannot be found.".to_owned()))?;

        Ok(user.is_site_admin)
    }
}
