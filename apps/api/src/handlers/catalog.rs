use axum::Json;
use axum::body::Bytes;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use salary_folders_core::{AppError, LoginName};
use salary_folders_domain::{FolderItemId, NewDocument};

use crate::dto::{
    CallerContextResponse, SalaryDocumentResponse, SalaryFolderPermissionsResponse,
    SalaryFolderResponse, UploadDocumentsResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_salary_folders_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SalaryFolderResponse>>> {
    let folders = state
        .catalog_service
        .list_salary_folders()
        .await?
        .into_iter()
        .map(SalaryFolderResponse::from)
        .collect();

    Ok(Json(folders))
}

pub async fn list_folder_documents_handler(
    State(state): State<AppState>,
    Path(folder_id): Path<i64>,
) -> ApiResult<Json<Vec<SalaryDocumentResponse>>> {
    let documents = state
        .catalog_service
        .list_folder_documents(FolderItemId::new(folder_id)?)
        .await?
        .into_iter()
        .map(SalaryDocumentResponse::from)
        .collect();

    Ok(Json(documents))
}

pub async fn folder_permissions_handler(
    State(state): State<AppState>,
    Extension(acting): Extension<LoginName>,
    Path(folder_id): Path<i64>,
) -> ApiResult<Json<SalaryFolderPermissionsResponse>> {
    let permissions = state
        .catalog_service
        .folder_permissions(&acting, FolderItemId::new(folder_id)?)
        .await?;

    Ok(Json(SalaryFolderPermissionsResponse::from(permissions)))
}

pub async fn upload_document_handler(
    State(state): State<AppState>,
    Extension(acting): Extension<LoginName>,
    Path((folder_id, file_name)): Path<(i64, String)>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<UploadDocumentsResponse>)> {
    let uploaded = state
        .catalog_service
        .upload_documents(
            &acting,
            FolderItemId::new(folder_id)?,
            vec![NewDocument {
                file_name,
                content: body.to_vec(),
            }],
        )
        .await?;
    let uploaded = u32::try_from(uploaded)
        .map_err(|error| AppError::Internal(format!("upload count overflow: {error}")))?;

    Ok((StatusCode::CREATED, Json(UploadDocumentsResponse { uploaded })))
}

pub async fn caller_context_handler(
    State(state): State<AppState>,
    Extension(acting): Extension<LoginName>,
) -> Json<CallerContextResponse> {
    let context = state.catalog_service.caller_context(&acting).await;

    Json(CallerContextResponse::from(context))
}
