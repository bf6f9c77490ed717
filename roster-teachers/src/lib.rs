//! Teacher resource for Roster
//!
//! Provides the `teachers` collection over HTTP:
//! - List, Get, Create
//! - Full update (PUT) and partial update (PATCH)
//! - Delete by path id or by `_id` in the body
//! - An echo endpoint for liveness checks
//!
//! Records live in a [`TeacherStore`]; the in-memory and SQLite backends
//! ship with the crate.

pub mod handlers;
pub mod model;
pub mod routes;
pub mod storage;

pub use handlers::TeachersState;
pub use model::{FullUpdate, NewTeacher, Teacher, TeacherPatch};
pub use routes::{mount, router};
pub use storage::{EphemeralStore, SqliteStore, StorageError, TeacherStore};
