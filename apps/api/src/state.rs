use std::sync::Arc;

use crate::config::Config;
use crate::sheets_client::SpreadsheetReader;
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Built once at startup; collaborators are read-only and shared across
/// concurrent requests. Nothing request-scoped lives here.
#[derive(Clone)]
pub struct AppState {
    /// Influencer dataset source. Default: Google Sheets REST client.
    pub sheets: Arc<dyn SpreadsheetReader>,
    /// Report destination. Default: S3-compatible object store.
    pub store: Arc<dyn FileStore>,
    pub config: Config,
}
