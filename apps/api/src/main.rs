mod campaign;
mod config;
mod errors;
mod influencers;
mod report;
mod routes;
mod sheets_client;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::sheets_client::SheetsClient;
use crate::state::AppState;
use crate::storage::{build_s3_client, S3FileStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting KOL report API v{}", env!("CARGO_PKG_VERSION"));

    // Spreadsheet reader (influencer dataset)
    let sheets = SheetsClient::new(
        config.sheets_api_base.clone(),
        config.google_access_token.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!("Sheets client initialized (spreadsheet: {})", config.spreadsheet_id);

    // File store (published reports)
    let s3 = build_s3_client(&config).await;
    let store = S3FileStore::new(s3, config.s3_bucket.clone(), config.public_base_url.clone());
    info!("S3 file store initialized (bucket: {})", config.s3_bucket);

    let state = AppState {
        sheets: Arc::new(sheets),
        store: Arc::new(store),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the intake form host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
