//! HTTP handlers for the teacher collection

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use roster_core::{ApiError, ErrorCode, ObjectId};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::model::{DeleteRequest, FullUpdate, ModelError, NewTeacher, Teacher, TeacherPatch};
use crate::storage::{EphemeralStore, StorageError, TeacherStore};

/// Prefix of every echo reply
pub const ECHO_PREFIX: &str = "echo REST GET returned input msg:";

/// Shared state for teacher handlers
pub struct TeachersState {
    pub store: Arc<dyn TeacherStore>,
}

impl TeachersState {
    pub fn new(store: Arc<dyn TeacherStore>) -> Self {
        Self { store }
    }

    /// State over a fresh in-memory store
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(EphemeralStore::new()))
    }
}

/// Error half of every handler result
#[derive(Debug)]
pub struct HandlerError(pub ApiError);

impl From<ApiError> for HandlerError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        error_response(&self.0)
    }
}

pub type HandlerResult = Result<Response, HandlerError>;

// === Handlers ===

/// GET /echo/:msg
pub async fn echo(Path(msg): Path<String>) -> Response {
    (StatusCode::OK, format!("{ECHO_PREFIX}{msg}")).into_response()
}

/// GET /
pub async fn list_teachers(State(state): State<Arc<TeachersState>>) -> HandlerResult {
    let teachers = state.store.find_all().await.map_err(|e| {
        warn!(error = %e, "Failed to list teachers");
        ApiError::new(ErrorCode::ReadFailed, "Internal server error")
    })?;

    info!(count = teachers.len(), "List teachers");
    Ok(json_response(StatusCode::OK, &teachers))
}

/// GET /:id
pub async fn get_teacher(
    State(state): State<Arc<TeachersState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    info!(id = %id, "Get teacher");

    let teacher = find_teacher(&state, &id).await?;
    Ok(json_response(StatusCode::OK, &teacher))
}

/// POST /
pub async fn create_teacher(State(state): State<Arc<TeachersState>>, body: Bytes) -> HandlerResult {
    let new_teacher: NewTeacher = parse_body(&body)?;

    let teacher = state.store.create(new_teacher).await.map_err(|e| {
        warn!(error = %e, "Failed to create teacher");
        ApiError::new(ErrorCode::SaveFailed, "Save failed")
    })?;

    info!(id = %teacher.id, "Created teacher");
    Ok(json_response(StatusCode::CREATED, &teacher))
}

/// PUT /:id
pub async fn update_teacher(
    State(state): State<Arc<TeachersState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let update: FullUpdate = parse_body(&body)?;
    info!(id = %id, "Full update of teacher");

    let mut teacher = find_teacher(&state, &id).await?;
    update.apply(&mut teacher);

    let saved = save_teacher(&state, &teacher).await?;
    Ok(json_response(StatusCode::CREATED, &saved))
}

/// PATCH /:id
pub async fn patch_teacher(
    State(state): State<Arc<TeachersState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> HandlerResult {
    let id = parse_id(&id)?;
    let patch = TeacherPatch::new(parse_object(&body)?);
    info!(id = %id, attributes = ?patch.keys().collect::<Vec<_>>(), "Partial update of teacher");

    let teacher = find_teacher(&state, &id).await?;
    let patched = patch.apply(&teacher).map_err(|e| malformed_body(&e))?;

    let saved = save_teacher(&state, &patched).await?;
    Ok(json_response(StatusCode::CREATED, &saved))
}

/// DELETE /:id
pub async fn delete_teacher(
    State(state): State<Arc<TeachersState>>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_id(&id)?;
    info!(id = %id, "Delete teacher");

    remove_teacher(&state, &id).await
}

/// DELETE / with `{"_id": ...}` in the body
pub async fn delete_teacher_by_body_id(
    State(state): State<Arc<TeachersState>>,
    body: Bytes,
) -> HandlerResult {
    let request: DeleteRequest = parse_body(&body)?;
    let Some(raw) = request.id_str().filter(|raw| !raw.is_empty()) else {
        return Err(ApiError::new(
            ErrorCode::InvalidIdentifier,
            "Expected _id in body of DELETE request",
        )
        .into());
    };
    let id = parse_id(raw)?;
    info!(id = %id, "Delete teacher by body id");

    remove_teacher(&state, &id).await
}

/// PUT, PATCH and DELETE on `{base}/`, where the path id is empty
pub async fn missing_path_id() -> HandlerError {
    ApiError::new(ErrorCode::InvalidIdentifier, "Expected _id value in url").into()
}

// === Store steps ===

async fn find_teacher(state: &TeachersState, id: &ObjectId) -> Result<Teacher, ApiError> {
    state.store.find_by_id(id).await.map_err(|e| match e {
        StorageError::NotFound(_) => not_found(id),
        other => {
            warn!(id = %id, error = %other, "Teacher lookup failed");
            ApiError::new(ErrorCode::ReadFailed, "Lookup failed").with_resource(id.to_string())
        }
    })
}

async fn save_teacher(state: &TeachersState, teacher: &Teacher) -> Result<Teacher, ApiError> {
    state.store.save(teacher).await.map_err(|e| match e {
        StorageError::NotFound(_) => not_found(&teacher.id),
        other => {
            warn!(id = %teacher.id, error = %other, "Failed to save teacher");
            ApiError::new(ErrorCode::SaveFailed, "Save failed").with_resource(teacher.id.to_string())
        }
    })
}

async fn remove_teacher(state: &TeachersState, id: &ObjectId) -> HandlerResult {
    let teacher = find_teacher(state, id).await?;

    let removed = state.store.remove(&teacher).await.map_err(|e| match e {
        StorageError::NotFound(_) => not_found(id),
        other => {
            warn!(id = %id, error = %other, "Failed to remove teacher");
            ApiError::new(ErrorCode::RemoveFailed, "Remove failed").with_resource(id.to_string())
        }
    })?;

    // 204 carries no body on the wire
    info!(id = %removed.id, name = ?removed.name, "Removed teacher");
    Ok(StatusCode::NO_CONTENT.into_response())
}

// === Input guards ===

fn parse_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse(raw).map_err(|_| {
        ApiError::new(
            ErrorCode::InvalidIdentifier,
            format!("Expected a 24 character hex _id, got: {raw}"),
        )
        .with_resource(raw)
    })
}

/// The body as a JSON object. An empty body reads as `{}`.
fn parse_object(body: &Bytes) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(malformed_body(&ModelError::NotAnObject)),
        Err(e) => Err(malformed_body(&e)),
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let object = parse_object(body)?;
    serde_json::from_value(Value::Object(object)).map_err(|e| malformed_body(&e))
}

fn malformed_body(e: &dyn std::fmt::Display) -> ApiError {
    ApiError::new(ErrorCode::MalformedBody, format!("Invalid request body: {e}"))
}

fn not_found(id: &ObjectId) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("Not found Teacher for id:{id}"))
        .with_resource(id.to_string())
}

// === Helpers ===

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, Json(body)).into_response()
}

fn error_response(err: &ApiError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        err.to_json(),
    )
        .into_response()
}
