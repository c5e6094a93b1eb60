//! Principals owned by the content platform.

use salary_folders_core::{AppError, AppResult, LoginName};
use serde::{Deserialize, Serialize};

/// Stable numeric identifier of a platform principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrincipalId(i64);

impl PrincipalId {
    /// Creates a principal identifier, rejecting non-positive values.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "principal id must be positive, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Principal flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// Individual user account.
    User,
    /// Platform-managed group.
    Group,
}

/// A user or group recognized by the content platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    login_name: String,
    title: String,
    kind: PrincipalKind,
}

impl Principal {
    /// Creates a user principal.
    #[must_use]
    pub fn user(id: PrincipalId, login_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            login_name: login_name.into(),
            title: title.into(),
            kind: PrincipalKind::User,
        }
    }

    /// Creates a group principal.
    #[must_use]
    pub fn group(id: PrincipalId, login_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            login_name: login_name.into(),
            title: title.into(),
            kind: PrincipalKind::Group,
        }
    }

    /// Returns the stable identifier.
    #[must_use]
    pub fn id(&self) -> PrincipalId {
        self.id
    }

    /// Returns the platform login name (claims-encoded for users).
    #[must_use]
    pub fn login_name(&self) -> &str {
        self.login_name.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the principal flavor.
    #[must_use]
    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }

    /// Returns whether the principal answers to the given login name.
    ///
    /// Both sides are compared in claims-encoded form.
    #[must_use]
    pub fn matches_login(&self, login_name: &LoginName) -> bool {
        match LoginName::new(self.login_name.as_str()) {
            Ok(own) => own.claims() == login_name.claims(),
            Err(_) => false,
        }
    }
}

/// A named group whose membership defines a role, such as payroll officers.
///
/// Membership is managed by the platform and only ever read here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGroup {
    principal: Principal,
}

impl AuthorizationGroup {
    /// Wraps a group principal.
    pub fn new(principal: Principal) -> AppResult<Self> {
        if principal.kind() != PrincipalKind::Group {
            return Err(AppError::Validation(format!(
                "principal '{}' is not a group",
                principal.title()
            )));
        }

        Ok(Self { principal })
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> PrincipalId {
        self.principal.id()
    }

    /// Returns the group display name.
    #[must_use]
    pub fn title(&self) -> &str {
        self.principal.title()
    }

    /// Returns the underlying principal.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
