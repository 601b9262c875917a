use super::protocol::{ENDPOINT_HEALTH, ENDPOINT_QUERY, HealthResponse, QueryParams};
use super::service::WorkerService;
use crate::ranking::types::ScoredResult;

use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router, http::StatusCode};
use std::sync::Arc;

pub fn router(service: Arc<WorkerService>) -> Router {
    Router::new()
        .route(ENDPOINT_QUERY, get(handle_query))
        .route(ENDPOINT_HEALTH, get(handle_health))
        .layer(Extension(service))
}

pub async fn handle_query(
    Extension(service): Extension<Arc<WorkerService>>,
    Query(params): Query<QueryParams>,
) -> (StatusCode, Json<Vec<ScoredResult>>) {
    let age = params.age().or(service.default_age());
    let title = params.titulo;

    match tokio::task::spawn_blocking(move || service.handle_query(&title, age)).await {
        Ok(results) => (StatusCode::OK, Json(results)),
        Err(e) => {
            tracing::error!("Ranking task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(vec![]))
        }
    }
}

pub async fn handle_health(
    Extension(service): Extension<Arc<WorkerService>>,
) -> Json<HealthResponse> {
    Json(service.health())
}
