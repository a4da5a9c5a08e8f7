//! Axum route handlers for campaign report requests.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::campaign::intake::{IntakeRecord, ProcessRequest};
use crate::campaign::pipeline::run_report_pipeline;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub link: String,
}

/// POST /process
///
/// Validates the intake row (at least 6 fields) before touching any
/// collaborator, then renders and publishes the report.
pub async fn handle_process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let intake = IntakeRecord::from_row(&request.row)?;

    let link = run_report_pipeline(&state, intake).await?;

    Ok(Json(ProcessResponse { link }))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::test_config;
    use crate::routes::build_router;
    use crate::sheets_client::{SheetsError, SpreadsheetReader};
    use crate::state::AppState;
    use crate::storage::{FileStore, StoreError};

    struct FakeSheet {
        rows: Vec<Vec<String>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpreadsheetReader for FakeSheet {
        async fn read_rows(
            &self,
            _spreadsheet_id: &str,
            _range: &str,
        ) -> Result<Vec<Vec<String>>, SheetsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.clone())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        upload_error: Option<&'static str>,
        uploads: Mutex<Vec<(String, Vec<u8>, String)>>,
        grants: AtomicUsize,
    }

    #[async_trait]
    impl FileStore for FakeStore {
        async fn upload(
            &self,
            name: &str,
            bytes: Vec<u8>,
            folder: &str,
        ) -> Result<String, StoreError> {
            self.uploads
                .lock()
                .unwrap()
                .push((name.to_string(), bytes, folder.to_string()));
            if let Some(message) = self.upload_error {
                return Err(StoreError::Upload {
                    name: name.to_string(),
                    message: message.to_string(),
                });
            }
            Ok(format!("{folder}/{name}"))
        }

        async fn grant_public_read(&self, _object_id: &str) -> Result<(), StoreError> {
            self.grants.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn share_link(&self, object_id: &str) -> String {
            format!("https://files.test/{object_id}")
        }
    }

    fn header() -> Vec<String> {
        ["username", "raw_followers", "avgLikes", "avgComments", "engagement", "location"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn five_rows() -> Vec<Vec<String>> {
        let mut rows = vec![header()];
        for r in [
            ["an", "25000", "800", "60", "3,2", "[\"Vietnam\"]"],
            ["binh", "300000", "9000", "400", "1,5", "[\"Vietnam\"]"],
            ["chai", "45000", "1500", "90", "2.8", "Thailand"],
            ["dung", "60000", "2100", "120", "4.1", "Vietnam"],
            ["emi", "1200000", "40000", "2500", "0.9", "Japan"],
        ] {
            rows.push(r.iter().map(|s| s.to_string()).collect());
        }
        rows
    }

    fn setup(rows: Vec<Vec<String>>) -> (AppState, Arc<FakeSheet>, Arc<FakeStore>) {
        setup_with_store(rows, FakeStore::default())
    }

    fn setup_with_store(
        rows: Vec<Vec<String>>,
        store: FakeStore,
    ) -> (AppState, Arc<FakeSheet>, Arc<FakeStore>) {
        let sheets = Arc::new(FakeSheet {
            rows,
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(store);
        let state = AppState {
            sheets: sheets.clone(),
            store: store.clone(),
            config: test_config(),
        };
        (state, sheets, store)
    }

    async fn post(state: AppState, body: Value) -> (StatusCode, Value) {
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn intake_row(kol_type: &str, country: &str) -> Value {
        json!({
            "row": ["2026-10-01 09:30", "Pho House", "F&B", "Awareness", kol_type, country]
        })
    }

    #[tokio::test]
    async fn test_process_returns_public_link() {
        let (state, sheets, store) = setup(five_rows());
        let (status, body) = post(state, intake_row("Micro influencer", "Vietnam")).await;

        assert_eq!(status, StatusCode::OK, "body: {body}");
        let link = body["link"].as_str().unwrap();
        assert!(link.starts_with("https://files.test/kol-reports/kol-report-"));
        assert!(link.ends_with(".pdf"));
        assert_eq!(body.as_object().unwrap().len(), 1);

        assert_eq!(sheets.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.grants.load(Ordering::SeqCst), 1);
        let uploads = store.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].1.starts_with(b"%PDF"));
        assert_eq!(uploads[0].2, "kol-reports");
    }

    #[tokio::test]
    async fn test_fallback_request_still_publishes() {
        let (state, _, store) = setup(five_rows());
        let (status, _) = post(state, intake_row("", "France")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(store.uploads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_row_rejected_without_collaborator_calls() {
        let (state, sheets, store) = setup(five_rows());
        let (status, body) = post(state, json!({ "row": ["a", "b", "c", "d"] })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(sheets.calls.load(Ordering::SeqCst), 0);
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_row_rejected() {
        let (state, sheets, _) = setup(five_rows());
        let (status, body) = post(state, json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
        assert_eq!(sheets.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_rejected_with_error_body() {
        let (state, _, _) = setup(five_rows());
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/process")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_header_only_sheet_is_generic_failure() {
        let (state, _, store) = setup(vec![header()]);
        let (status, body) = post(state, intake_row("Micro", "Vietnam")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Influencer sheet has no data rows");
        assert!(store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_column_is_generic_failure() {
        let mut rows = five_rows();
        rows[0][4] = "eng_rate".to_string();
        let (state, _, _) = setup(rows);
        let (status, body) = post(state, intake_row("Micro", "Vietnam")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("engagement"));
    }

    #[tokio::test]
    async fn test_upload_failure_is_generic_failure() {
        let store = FakeStore {
            upload_error: Some("bucket unreachable"),
            ..Default::default()
        };
        let (state, _, store) = setup_with_store(five_rows(), store);
        let (status, body) = post(state, intake_row("Micro", "Vietnam")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("bucket unreachable"));
        assert_eq!(store.uploads.lock().unwrap().len(), 1);
        assert_eq!(store.grants.load(Ordering::SeqCst), 0);
    }
}
