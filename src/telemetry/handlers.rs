use super::protocol::{ENDPOINT_ENTRIES, ENDPOINT_REGISTER, ReadAllResponse};
use super::store::TelemetryStore;
use super::types::LogEntry;

use axum::routing::{get, post};
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

pub fn router(store: Arc<TelemetryStore>) -> Router {
    Router::new()
        .route(ENDPOINT_REGISTER, post(handle_register))
        .route(ENDPOINT_ENTRIES, get(handle_read_all))
        .layer(Extension(store))
}

pub async fn handle_register(
    Extension(store): Extension<Arc<TelemetryStore>>,
    Json(entry): Json<LogEntry>,
) -> StatusCode {
    match tokio::task::spawn_blocking(move || store.register(entry)).await {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(e) => {
            tracing::error!("Register task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn handle_read_all(
    Extension(store): Extension<Arc<TelemetryStore>>,
) -> (StatusCode, Json<ReadAllResponse>) {
    match tokio::task::spawn_blocking(move || store.read_all()).await {
        Ok(entries) => (StatusCode::OK, Json(ReadAllResponse { entries })),
        Err(e) => {
            tracing::error!("Read task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ReadAllResponse { entries: vec![] }),
            )
        }
    }
}
