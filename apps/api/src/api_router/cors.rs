use std::time::Duration;

use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderValue, Method};
use salary_folders_core::AppError;
use tower_http::cors::CorsLayer;

const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

pub(super) fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(allowed_origin)
                .map_err(|error| AppError::Internal(format!("invalid ALLOWED_ORIGIN: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, SET_COOKIE])
        .max_age(PREFLIGHT_MAX_AGE))
}
