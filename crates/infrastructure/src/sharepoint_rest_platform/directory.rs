use super::odata::{Collection, GroupRecord, UserRecord, quote_literal};

use super::*;

const USER_FIELDS: &str = "Id,LoginName,Title";

impl SharePointRestPlatform {
    async fn site_user(
        &self,
        login_name: &LoginName,
        select: &str,
        expand: Option<&str>,
    ) -> AppResult<UserRecord> {
        let mut params = vec![
            ("@login", quote_literal(login_name.claims().as_str())),
            ("$select", select.to_owned()),
        ];
        if let Some(expand) = expand {
            params.push(("$expand", expand.to_owned()));
        }

        let url = self.api_url("web/siteusers/getByLoginName(@login)", &params)?;
        self.get_json(url).await
    }

    pub(super) async fn find_user_with_groups_impl(
        &self,
        login_name: &LoginName,
    ) -> AppResult<UserMemberships> {
        let record = self
            .site_user(login_name, "Id,LoginName,Title,Groups/Title", Some("Groups"))
            .await?;

        Ok(UserMemberships {
            user: record.to_principal()?,
            group_titles: record.groups.into_iter().map(|group| group.title).collect(),
        })
    }

    pub(super) async fn find_group_by_name_impl(&self, name: &str) -> AppResult<Option<Principal>> {
        let url = self.api_url(
            "web/sitegroups/getByName(@name)",
            &[
                ("@name", quote_literal(name)),
                ("$select", "Id,LoginName,Title".to_owned()),
            ],
        )?;

        match self.get_json::<GroupRecord>(url).await {
            Ok(record) => record.into_principal().map(Some),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(error) => Err(error),
        }
    }

    pub(super) async fn ensure_user_impl(&self, login_name: &LoginName) -> AppResult<Principal> {
        let url = self.api_url("web/ensureuser", &[("$select", USER_FIELDS.to_owned())])?;
        let body = serde_json::json!({ "logonName": login_name.claims() });

        let record: UserRecord = self.post_json(url, Some(&body)).await?;
        record.to_principal()
    }

    pub(super) async fn list_site_users_impl(&self) -> AppResult<Vec<Principal>> {
        let url = self.api_url("web/siteusers", &[("$select", USER_FIELDS.to_owned())])?;
        let users: Collection<UserRecord> = self.get_json(url).await?;

        users.value.iter().map(UserRecord::to_principal).collect()
    }

    pub(super) async fn is_site_admin_impl(&self, login_name: &LoginName) -> AppResult<bool> {
        let record = self
            .site_user(login_name, "Id,LoginName,Title,IsSiteAdmin", None)
            .await?;

        Ok(record.is_site_admin)
    }
}
