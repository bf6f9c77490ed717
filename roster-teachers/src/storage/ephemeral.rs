//! In-memory ephemeral storage backend

use super::traits::{StorageError, TeacherStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use roster_core::ObjectId;
use std::collections::BTreeMap;

use crate::model::{NewTeacher, Teacher};

/// Ephemeral (in-memory) storage backend
///
/// Ordered by identifier so listings come back in creation order.
#[derive(Debug, Default)]
pub struct EphemeralStore {
    teachers: RwLock<BTreeMap<ObjectId, Teacher>>,
}

impl EphemeralStore {
    pub fn new() -> Self {
        Self {
            teachers: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.teachers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.teachers.read().is_empty()
    }
}

#[async_trait]
impl TeacherStore for EphemeralStore {
    fn backend(&self) -> &'static str {
        "ephemeral"
    }

    async fn find_all(&self) -> Result<Vec<Teacher>, StorageError> {
        Ok(self.teachers.read().values().cloned().collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Teacher, StorageError> {
        self.teachers
            .read()
            .get(id)
            .cloned()
            .ok_or(StorageError::NotFound(*id))
    }

    async fn create(&self, teacher: NewTeacher) -> Result<Teacher, StorageError> {
        let teacher = teacher.into_teacher(ObjectId::new());
        self.teachers.write().insert(teacher.id, teacher.clone());
        Ok(teacher)
    }

    async fn save(&self, teacher: &Teacher) -> Result<Teacher, StorageError> {
        let mut teachers = self.teachers.write();
        let slot = teachers
            .get_mut(&teacher.id)
            .ok_or(StorageError::NotFound(teacher.id))?;
        *slot = teacher.clone();
        Ok(teacher.clone())
    }

    async fn remove(&self, teacher: &Teacher) -> Result<Teacher, StorageError> {
        self.teachers
            .write()
            .remove(&teacher.id)
            .ok_or(StorageError::NotFound(teacher.id))
    }
}
