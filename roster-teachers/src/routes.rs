//! Route table for the teacher collection
//!
//! Paths in [`router`] are relative; [`mount`] places them under a base
//! path (for example `/api/v1/teachers`).

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::handlers::{
    create_teacher, delete_teacher, delete_teacher_by_body_id, echo, get_teacher, list_teachers,
    missing_path_id, patch_teacher, update_teacher, TeachersState,
};

fn routes() -> Router<Arc<TeachersState>> {
    Router::new()
        .route(
            "/",
            get(list_teachers)
                .post(create_teacher)
                .delete(delete_teacher_by_body_id),
        )
        .route(
            "/:id",
            get(get_teacher)
                .put(update_teacher)
                .patch(patch_teacher)
                .delete(delete_teacher),
        )
        .route("/echo/:msg", get(echo))
}

/// Build the teacher router
pub fn router(state: Arc<TeachersState>) -> Router {
    routes().with_state(state)
}

/// Build the teacher router nested under `base`.
///
/// Nesting has no route for `{base}/`, so it is added here: GET lists the
/// collection and the id-keyed methods see an empty id.
pub fn mount(base: &str, state: Arc<TeachersState>) -> Router {
    Router::new()
        .route(
            &format!("{base}/"),
            get(list_teachers)
                .put(missing_path_id)
                .patch(missing_path_id)
                .delete(missing_path_id),
        )
        .nest(base, routes())
        .with_state(state)
}
