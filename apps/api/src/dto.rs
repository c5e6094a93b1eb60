mod catalog;
mod gateway;

use serde::Serialize;
use ts_rs::TS;

pub use catalog::{
    CallerContextResponse, SalaryDocumentResponse, SalaryFolderPermissionsResponse,
    SalaryFolderResponse, UploadDocumentsResponse,
};
pub use gateway::{
    AddSalaryFolderCommand, GatewayErrorPayload, GatewayResponse, HandshakeResponse,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}
