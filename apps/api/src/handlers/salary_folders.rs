use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use salary_folders_core::{AppError, LoginName};
use serde_json::Value;
use tracing::{info, warn};

use crate::dto::{AddSalaryFolderCommand, GatewayErrorPayload, GatewayResponse, HandshakeResponse};
use crate::middleware::{CLIENT_PRINCIPAL_HEADER, acting_identity};
use crate::state::AppState;

const NOT_A_PAYROLL_OFFICER: &str =
    "You are not a Payroll Officer and are not allowed to add a folder";

/// Result of one gateway invocation before it is written to the wire.
#[derive(Debug, PartialEq)]
pub enum GatewayOutcome {
    Handshake,
    Envelope(StatusCode, GatewayResponse),
}

impl IntoResponse for GatewayOutcome {
    fn into_response(self) -> Response {
        match self {
            Self::Handshake => Json(HandshakeResponse::AUTHENTICATED).into_response(),
            Self::Envelope(status, envelope) => (status, Json(envelope)).into_response(),
        }
    }
}

pub async fn handshake_handler(headers: HeaderMap) -> GatewayOutcome {
    info!(acting = caller_label(&headers), "salary folder handshake");
    GatewayOutcome::Handshake
}

pub async fn add_salary_folder_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> GatewayOutcome {
    let outcome = handle_command(&state, &headers, &body).await;

    let (status, response) = match &outcome {
        GatewayOutcome::Handshake => (
            StatusCode::OK,
            serde_json::to_string(&HandshakeResponse::AUTHENTICATED).unwrap_or_default(),
        ),
        GatewayOutcome::Envelope(status, envelope) => {
            (*status, serde_json::to_string(envelope).unwrap_or_default())
        }
    };
    info!(
        acting = caller_label(&headers),
        request = %String::from_utf8_lossy(&body),
        status = status.as_u16(),
        response = response.as_str(),
        "salary folder request handled"
    );

    outcome
}

async fn handle_command(state: &AppState, headers: &HeaderMap, body: &[u8]) -> GatewayOutcome {
    if body.is_empty() {
        info!("no command to process");
        return GatewayOutcome::Handshake;
    }

    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(payload) => payload,
        Err(error) => {
            warn!(error = %error, "request body is not valid json");
            return GatewayOutcome::Envelope(
                StatusCode::BAD_REQUEST,
                GatewayResponse::rejected(GatewayErrorPayload::parse(&error)),
            );
        }
    };

    let folder = match payload.get("folder") {
        Some(folder) if !is_falsy(folder) => folder.clone(),
        _ => {
            info!("folder argument is not specified");
            return GatewayOutcome::Envelope(StatusCode::OK, GatewayResponse::empty());
        }
    };

    let acting = match acting_identity(headers) {
        Ok(acting) => acting,
        Err(identity_error) => {
            warn!(
                error = %identity_error,
                "caller identity unavailable, treated as not a payroll officer"
            );
            return forbidden();
        }
    };

    if !state.payroll_officer_service.is_payroll_officer(&acting).await {
        warn!(acting = %acting, "caller is not a payroll officer");
        return forbidden();
    }

    let employee_login = match parse_employee_login(folder) {
        Ok(employee_login) => employee_login,
        Err(validation_error) => {
            return GatewayOutcome::Envelope(
                StatusCode::BAD_REQUEST,
                GatewayResponse::failure(GatewayErrorPayload::from_app_error(
                    Some("validate_request"),
                    &validation_error,
                )),
            );
        }
    };

    match state.provisioner.provision(&employee_login).await {
        Ok(provisioned) => {
            info!(
                acting = %acting,
                employee = %employee_login,
                folder = provisioned.folder.name(),
                "folder created"
            );
            GatewayOutcome::Envelope(StatusCode::OK, GatewayResponse::success())
        }
        Err(provisioning_error) => {
            warn!(
                acting = %acting,
                employee = %employee_login,
                step = provisioning_error.step(),
                error = %provisioning_error,
                "folder cannot be created"
            );
            GatewayOutcome::Envelope(
                StatusCode::BAD_REQUEST,
                GatewayResponse::failure(GatewayErrorPayload::from(&provisioning_error)),
            )
        }
    }
}

fn forbidden() -> GatewayOutcome {
    GatewayOutcome::Envelope(
        StatusCode::FORBIDDEN,
        GatewayResponse::forbidden(NOT_A_PAYROLL_OFFICER.to_owned()),
    )
}

/// `null`, `false`, `0` and `""` count as an absent folder argument.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_employee_login(folder: Value) -> Result<LoginName, AppError> {
    let command = serde_json::from_value::<AddSalaryFolderCommand>(folder)
        .map_err(|error| AppError::Validation(format!("invalid folder argument: {error}")))?;

    LoginName::new(command.employee_login_name)
}

fn caller_label(headers: &HeaderMap) -> &str {
    headers
        .get(CLIENT_PRINCIPAL_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("<anonymous>")
}
