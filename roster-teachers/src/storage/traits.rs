//! Storage backend traits

use async_trait::async_trait;
use roster_core::ObjectId;
use thiserror::Error;

use crate::model::{NewTeacher, Teacher};

/// Errors from storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Teacher not found: {0}")]
    NotFound(ObjectId),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Document store client for the teacher collection.
///
/// Each call is independent: there is no locking or transaction spanning a
/// lookup and the save or remove that follows it.
#[async_trait]
pub trait TeacherStore: Send + Sync {
    /// Short backend name, reported by the health endpoint
    fn backend(&self) -> &'static str;

    /// All records, in identifier order
    async fn find_all(&self) -> Result<Vec<Teacher>, StorageError>;

    /// A single record
    async fn find_by_id(&self, id: &ObjectId) -> Result<Teacher, StorageError>;

    /// Persist a new record under a freshly assigned identifier
    async fn create(&self, teacher: NewTeacher) -> Result<Teacher, StorageError>;

    /// Overwrite an existing record
    async fn save(&self, teacher: &Teacher) -> Result<Teacher, StorageError>;

    /// Delete an existing record, returning its last stored state
    async fn remove(&self, teacher: &Teacher) -> Result<Teacher, StorageError>;
}
