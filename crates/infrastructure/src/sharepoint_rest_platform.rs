use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use salary_folders_application::{DocumentLibrary, PrincipalDirectory, UserMemberships};
use salary_folders_core::{AppError, AppResult, LoginName};
use salary_folders_domain::{
    FolderItemId, NewDocument, Principal, PrincipalId, RoleAssignment, SalaryDocument,
    SalaryFolder,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell};
use url::Url;
use url::form_urlencoded::byte_serialize;

mod auth;
mod directory;
mod library;
mod odata;

use auth::CachedToken;
use odata::ODATA_JSON;

#[cfg(test)]
mod tests;

/// Connection settings for one site.
#[derive(Clone)]
pub struct SharePointConfig {
    /// Absolute site URL, for example `https://contoso.sharepoint.com/sites/hr`.
    pub site_url: Url,
    /// App-only client identifier.
    pub client_id: String,
    /// App-only client secret.
    pub client_secret: String,
    /// Tenant realm. Discovered from the site when absent.
    pub realm: Option<String>,
}

impl std::fmt::Debug for SharePointConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SharePointConfig")
            .field("site_url", &self.site_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("realm", &self.realm)
            .finish()
    }
}

/// Content platform adapter over the site REST API with app-only credentials.
pub struct SharePointRestPlatform {
    http_client: reqwest::Client,
    config: SharePointConfig,
    realm: OnceCell<String>,
    token: Mutex<Option<CachedToken>>,
}

impl SharePointRestPlatform {
    /// Creates an adapter for one site.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: SharePointConfig) -> Self {
        let realm = match config.realm.clone() {
            Some(realm) => OnceCell::new_with(Some(realm)),
            None => OnceCell::new(),
        };

        Self {
            http_client,
            config,
            realm,
            token: Mutex::new(None),
        }
    }

    /// Builds a REST endpoint URL below `{site}/_api/`.
    ///
    /// Parameter names are kept verbatim so `@alias` and `$select` reach the
    /// platform unencoded; values are form-encoded.
    fn api_url(&self, path: &str, params: &[(&str, String)]) -> AppResult<Url> {
        let site = self.config.site_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(format!("{site}/_api/{path}").as_str()).map_err(|error| {
            AppError::Internal(format!("invalid platform endpoint '{path}': {error}"))
        })?;

        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(name, value)| {
                    let value = byte_serialize(value.as_bytes()).collect::<String>();
                    format!("{name}={value}")
                })
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(query.as_str()));
        }

        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(token)
            .header(ACCEPT, ODATA_JSON)
            .send()
            .await
            .map_err(|error| AppError::Upstream(format!("platform request failed: {error}")))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(odata::error_for_status(status, body.as_str()))
    }

    async fn get_json<T>(&self, url: Url) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.http_client.get(url)).await?;
        read_json(response).await
    }

    async fn post_json<T>(&self, url: Url, body: Option<&Value>) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(self.post_request(url, body)).await?;
        read_json(response).await
    }

    async fn post(&self, url: Url, body: Option<&Value>) -> AppResult<()> {
        self.send(self.post_request(url, body)).await?;
        Ok(())
    }

    fn post_request(&self, url: Url, body: Option<&Value>) -> reqwest::RequestBuilder {
        let request = self.http_client.post(url).header(CONTENT_TYPE, ODATA_JSON);
        match body {
            Some(body) => request.json(body),
            None => request,
        }
    }
}

async fn read_json<T>(response: reqwest::Response) -> AppResult<T>
where
    T: DeserializeOwned,
{
    response
        .json::<T>()
        .await
        .map_err(|error| AppError::Upstream(format!("unexpected platform response: {error}")))
}

#[async_trait]
impl PrincipalDirectory for SharePointRestPlatform {
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
impl DocumentLibrary for SharePointRestPlatform {
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
