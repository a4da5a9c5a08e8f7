pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::campaign::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/process", post(handlers::handle_process))
        .with_state(state)
}
