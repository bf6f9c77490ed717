//! HTTP application for Roster

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use roster_core::{RequestId, REQUEST_ID_HEADER};
use roster_teachers::{EphemeralStore, SqliteStore, StorageError, TeacherStore, TeachersState};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, StorageConfig};

/// Open the configured storage backend
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn TeacherStore>, StorageError> {
    Ok(match config {
        StorageConfig::Ephemeral => Arc::new(EphemeralStore::new()),
        StorageConfig::Sqlite { path, collection } => Arc::new(SqliteStore::open(path, collection)?),
    })
}

/// Create the main application router
pub fn create_router(config: &ServerConfig, store: Arc<dyn TeacherStore>) -> Router {
    let backend = store.backend();
    let teachers = roster_teachers::mount(&config.base_path, Arc::new(TeachersState::new(store)));

    Router::new()
        .route("/health", get(move || health_check(backend)))
        .merge(teachers)
        .layer(middleware::from_fn(propagate_request_id))
        .layer(TraceLayer::new_for_http())
}

async fn health_check(backend: &'static str) -> impl IntoResponse {
    Json(serde_json::json!({ "status": "running", "storage": backend }))
}

/// Echo the caller's `x-request-id` (or mint one) and make it current for
/// the rest of the request.
async fn propagate_request_id(mut request: Request, next: Next) -> Response {
    let id = match request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(v) if !v.is_empty() => RequestId::with_id(v),
        _ => RequestId::new(),
    };

    let header = HeaderValue::from_str(id.as_str()).ok();
    if let Some(value) = &header {
        request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    let mut response = RequestId::scope(id, next.run(request)).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
