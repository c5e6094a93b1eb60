use std::sync::Arc;

use salary_folders_core::LoginName;
use tracing::{debug, warn};

use crate::{LibrarySettings, PrincipalDirectory};

/// Decides whether an acting identity belongs to the payroll officers group.
///
/// The check fails closed: any lookup error is logged and reported as "not a
/// payroll officer".
#[derive(Clone)]
pub struct PayrollOfficerService {
    directory: Arc<dyn PrincipalDirectory>,
    settings: LibrarySettings,
}

impl PayrollOfficerService {
    /// Creates the service from a directory implementation.
    #[must_use]
    pub fn new(directory: Arc<dyn PrincipalDirectory>, settings: LibrarySettings) -> Self {
        Self {
            directory,
            settings,
        }
    }

    /// Returns whether the acting identity is a payroll officer.
    ///
    /// Group titles are compared exactly (case-sensitive) and exactly one
    /// membership must match.
    pub async fn is_payroll_officer(&self, acting: &LoginName) -> bool {
        let group_name = self.settings.payroll_officers_group_name();

        match self.directory.find_user_with_groups(acting).await {
            Ok(memberships) => {
                debug!(
                    acting = %acting,
                    groups = ?memberships.group_titles,
                    "resolved caller group memberships"
                );

                memberships
                    .group_titles
                    .iter()
                    .filter(|title| title.as_str() == group_name)
                    .count()
                    == 1
            }
            Err(error) => {
                warn!(
                    error = %error,
                    acting = %acting,
                    group = group_name,
                    "payroll officer check failed, treating caller as not privileged"
                );
                false
            }
        }
    }

    /// Returns whether the acting identity administers the site collection.
    ///
    /// Fails closed like [`Self::is_payroll_officer`].
    pub async fn is_site_admin(&self, acting: &LoginName) -> bool {
        match self.directory.is_site_admin(acting).await {
            Ok(is_admin) => is_admin,
            Err(error) => {
                warn!(
                    error = %error,
                    acting = %acting,
                    "site admin check failed, treating caller as not an administrator"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests;
