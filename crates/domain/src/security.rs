use std::str::FromStr;

use salary_folders_core::AppError;
use serde::{Deserialize, Serialize};

use crate::PrincipalId;

/// Permission levels granted on salary folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    /// Read-only access, granted to the employee owning the folder.
    Read,
    /// Read/write access, granted to the payroll officers group.
    Contribute,
}

impl PermissionLevel {
    /// Returns a stable transport value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Contribute => "contribute",
        }
    }

    /// Returns the platform's built-in role definition identifier.
    #[must_use]
    pub fn role_definition_id(&self) -> i64 {
        match self {
            Self::Read => 1_073_741_826,
            Self::Contribute => 1_073_741_827,
        }
    }

    /// Maps a platform role definition identifier back to a known level.
    #[must_use]
    pub fn from_role_definition_id(value: i64) -> Option<Self> {
        match value {
            1_073_741_826 => Some(Self::Read),
            1_073_741_827 => Some(Self::Contribute),
            _ => None,
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "read" => Ok(Self::Read),
            "contribute" => Ok(Self::Contribute),
            _ => Err(AppError::Validation(format!(
                "unknown permission level '{value}'"
            ))),
        }
    }
}

/// Explicit permission grant attached to a folder after inheritance is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Principal receiving the grant.
    pub principal_id: PrincipalId,
    /// Granted level.
    pub level: PermissionLevel,
}

impl RoleAssignment {
    /// Creates a role assignment.
    #[must_use]
    pub fn new(principal_id: PrincipalId, level: PermissionLevel) -> Self {
        Self {
            principal_id,
            level,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::PermissionLevel;

    #[test]
    fn role_definition_ids_match_platform_builtins() {
        assert_eq!(PermissionLevel::Read.role_definition_id(), 1073741826);
        assert_eq!(PermissionLevel::Contribute.role_definition_id(), 1073741827);
        assert_eq!(
            PermissionLevel::from_role_definition_id(1073741827),
            Some(PermissionLevel::Contribute)
        );
        assert_eq!(PermissionLevel::from_role_definition_id(1073741829), None);
    }

    #[test]
    fn parses_transport_values() {
        assert!(matches!(
            PermissionLevel::from_str("read"),
            Ok(PermissionLevel::Read)
        ));
        assert!(PermissionLevel::from_str("full_control").is_err());
    }
}
