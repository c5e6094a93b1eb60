use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use salary_folders_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, allowed_origin: &str) -> Result<Router, AppError> {
    let cors_layer = build_cors_layer(allowed_origin)?;

    let catalog_routes = Router::new()
        .route(
            "/api/catalog/folders",
            get(handlers::catalog::list_salary_folders_handler),
        )
        .route(
            "/api/catalog/folders/{folder_id}/documents",
            get(handlers::catalog::list_folder_documents_handler),
        )
        .route(
            "/api/catalog/folders/{folder_id}/documents/{file_name}",
            post(handlers::catalog::upload_document_handler),
        )
        .route(
            "/api/catalog/folders/{folder_id}/permissions",
            get(handlers::catalog::folder_permissions_handler),
        )
        .route("/api/me", get(handlers::catalog::caller_context_handler))
        .route_layer(from_fn(middleware::require_acting_identity));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/salary-folders",
            get(handlers::salary_folders::handshake_handler)
                .post(handlers::salary_folders::add_salary_folder_handler),
        )
        .route(
            "/api/AddSalaryFolder",
            post(handlers::salary_folders::add_salary_folder_handler),
        )
        .merge(catalog_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
