use super::fanout::Coordinator;
use super::protocol::{BANNER, CoordinatorQueryParams, ENDPOINT_QUERY, ENDPOINT_ROOT};

use axum::extract::Query;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde_json::Value;
use std::sync::Arc;

pub fn router(coordinator: Arc<Coordinator>) -> Router {
    Router::new()
        .route(ENDPOINT_ROOT, get(handle_root))
        .route(ENDPOINT_QUERY, get(handle_query))
        .layer(Extension(coordinator))
}

pub async fn handle_root() -> &'static str {
    BANNER
}

pub async fn handle_query(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Query(params): Query<CoordinatorQueryParams>,
) -> Json<Vec<Value>> {
    let results = coordinator
        .handle_query(&params.titulo, params.age(), params.tipo_doc.as_deref())
        .await;

    tracing::info!(
        "Query '{}' merged {} results",
        params.titulo,
        results.len()
    );
    Json(results)
}
