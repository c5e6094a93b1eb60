use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Claims prefix the content platform uses for federated member accounts.
pub const MEMBERSHIP_CLAIMS_PREFIX: &str = "i:0#.f|membership|";

/// Login name of a principal, as supplied by the identity provider.
///
/// Values are kept exactly as received (trimmed). Lookups against the content
/// platform go through [`LoginName::claims`], which adds the membership claims
/// prefix unless the value is already claims-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoginName(String);

impl LoginName {
    /// Creates a validated login name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "login name must not be empty".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the login name as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether the value already carries a claims prefix.
    #[must_use]
    pub fn is_claims_encoded(&self) -> bool {
        self.0.contains('|')
    }

    /// Returns the claims-encoded form used for directory lookups.
    #[must_use]
    pub fn claims(&self) -> String {
        if self.is_claims_encoded() {
            self.0.clone()
        } else {
            format!("{MEMBERSHIP_CLAIMS_PREFIX}{}", self.0)
        }
    }

    /// Returns the bare account name (text after the last `|`).
    #[must_use]
    pub fn account_name(&self) -> &str {
        account_name_from_login(self.0.as_str())
    }
}

impl std::fmt::Display for LoginName {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Extracts the account part of a possibly claims-encoded login name.
#[must_use]
pub fn account_name_from_login(login_name: &str) -> &str {
    match login_name.rfind('|') {
        Some(index) => &login_name[index + 1..],
        None => login_name,
    }
}
