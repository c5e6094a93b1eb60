use salary_folders_application::ProvisioningError;
use salary_folders_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Handshake returned when the gateway receives no command.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/handshake-response.ts"
)]
pub struct HandshakeResponse {
    pub status: &'static str,
}

impl HandshakeResponse {
    pub const AUTHENTICATED: Self = Self {
        status: "Properly authenticated",
    };
}

/// `folder` member of the gateway command.
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/add-salary-folder-command.ts"
)]
pub struct AddSalaryFolderCommand {
    pub employee_login_name: String,
}

/// Raw error object carried in failure envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gateway-error-payload.ts"
)]
pub struct GatewayErrorPayload {
    pub step: Option<String>,
    pub kind: String,
    pub message: String,
}

impl GatewayErrorPayload {
    pub fn parse(error: &serde_json::Error) -> Self {
        Self {
            step: None,
            kind: "parse".to_owned(),
            message: error.to_string(),
        }
    }

    pub fn from_app_error(step: Option<&str>, error: &AppError) -> Self {
        Self {
            step: step.map(str::to_owned),
            kind: error.kind().to_owned(),
            message: error.to_string(),
        }
    }
}

impl From<&ProvisioningError> for GatewayErrorPayload {
    fn from(error: &ProvisioningError) -> Self {
        let kind = match error {
            ProvisioningError::GroupNotFound(_) => "not_found",
            other => other.cause().map_or("internal", AppError::kind),
        };

        Self {
            step: Some(error.step().to_owned()),
            kind: kind.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Gateway response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/gateway-response.ts"
)]
pub struct GatewayResponse {
    pub error: Option<GatewayErrorPayload>,
    #[ts(type = "unknown")]
    pub data: Option<Value>,
}

impl GatewayResponse {
    pub fn empty() -> Self {
        Self {
            error: None,
            data: None,
        }
    }

    pub fn success() -> Self {
        Self {
            error: None,
            data: Some(Value::from("Success")),
        }
    }

    pub fn failure(error: GatewayErrorPayload) -> Self {
        Self {
            error: Some(error),
            data: Some(Value::from("Failure")),
        }
    }

    pub fn rejected(error: GatewayErrorPayload) -> Self {
        Self {
            error: Some(error),
            data: None,
        }
    }

    pub fn forbidden(message: String) -> Self {
        Self {
            error: None,
            data: Some(Value::from(message)),
        }
    }
}
