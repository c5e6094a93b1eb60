use async_trait::async_trait;
use salary_folders_core::{AppResult, LoginName};
use salary_folders_domain::Principal;

/// A site user together with the display names of its group memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMemberships {
    /// Resolved user principal.
    pub user: Principal,
    /// Titles of the groups the user belongs to.
    pub group_titles: Vec<String>,
}

/// Port for principal lookups against the content platform.
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Resolves an existing site user and expands its group memberships.
    async fn find_user_with_groups(&self, login_name: &LoginName) -> AppResult<UserMemberships>;

    /// Finds a site group by display name.
    async fn find_group_by_name(&self, name: &str) -> AppResult<Option<Principal>>;

    /// Resolves a user, materializing it in the site directory when absent.
    ///
    /// Implementations must be idempotent.
    async fn ensure_user(&self, login_name: &LoginName) -> AppResult<Principal>;

    /// Lists all site users.
    async fn list_site_users(&self) -> AppResult<Vec<Principal>>;

    /// Returns whether the user administers the site collection.
    async fn is_site_admin(&self, login_name: &LoginName) -> AppResult<bool>;
}
