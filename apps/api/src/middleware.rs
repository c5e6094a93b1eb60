use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use salary_folders_core::{AppError, AppResult, LoginName};

use crate::error::ApiResult;

/// Header carrying the authenticated caller injected by the hosting platform.
pub const CLIENT_PRINCIPAL_HEADER: &str = "x-ms-client-principal-name";

/// Reads the acting identity from the platform-injected header.
pub fn acting_identity(headers: &HeaderMap) -> AppResult<LoginName> {
    let value = headers
        .get(CLIENT_PRINCIPAL_HEADER)
        .ok_or_else(|| {
            AppError::Unauthorized(format!("missing {CLIENT_PRINCIPAL_HEADER} header"))
        })?
        .to_str()
        .map_err(|error| {
            AppError::Unauthorized(format!("invalid {CLIENT_PRINCIPAL_HEADER} header: {error}"))
        })?;

    LoginName::new(value)
        .map_err(|_| AppError::Unauthorized(format!("empty {CLIENT_PRINCIPAL_HEADER} header")))
}

pub async fn require_acting_identity(mut request: Request, next: Next) -> ApiResult<Response> {
    let identity = acting_identity(request.headers())?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
