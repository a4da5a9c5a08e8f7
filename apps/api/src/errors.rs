use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::report::ReportError;
use crate::sheets_client::SheetsError;
use crate::storage::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only two status classes reach the caller: 400 for malformed intake input,
/// 500 for everything that fails while processing.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid data: {0}")]
    Validation(String),

    #[error("Influencer sheet has no data rows")]
    EmptyDataset,

    #[error("Influencer sheet is missing column '{0}'")]
    Schema(String),

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Report rendering error: {0}")]
    Report(#[from] ReportError),

    #[error("File store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Validation(msg) => tracing::debug!("Rejected intake: {msg}"),
            other => tracing::error!("Pipeline failed: {other}"),
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_maps_to_400() {
        let (status, body) = body_json(AppError::Validation("row too short".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid data: row too short");
    }

    #[tokio::test]
    async fn test_pipeline_errors_map_to_500_with_message() {
        let (status, body) = body_json(AppError::Schema("avgLikes".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("avgLikes"));

        let (status, body) = body_json(AppError::EmptyDataset).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Influencer sheet has no data rows");
    }

    #[tokio::test]
    async fn test_error_body_has_single_field() {
        let (_, body) = body_json(AppError::Report(ReportError::Pdf("boom".into()))).await;
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}
