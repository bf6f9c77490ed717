//! SQLite-backed document storage
//!
//! Each collection is one table of JSON documents keyed by the hex
//! identifier, so `ORDER BY id` is identifier order.

use super::traits::{StorageError, TeacherStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use roster_core::ObjectId;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::model::{NewTeacher, Teacher};

/// SQLite storage backend
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    collection: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>, collection: &str) -> Result<Self, StorageError> {
        let path = path.as_ref();
        debug!(path = %path.display(), collection = %collection, "Opening SQLite store");
        Self::init(Connection::open(path)?, collection)
    }

    /// A private in-memory database, gone when the store is dropped
    pub fn open_in_memory(collection: &str) -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?, collection)
    }

    fn init(conn: Connection, collection: &str) -> Result<Self, StorageError> {
        if !is_valid_collection(collection) {
            return Err(StorageError::InvalidCollection(collection.to_string()));
        }

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{collection}\" (
                id TEXT PRIMARY KEY NOT NULL,
                doc TEXT NOT NULL
            );"
        ))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            collection: collection.to_string(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run a blocking closure against the connection off the async runtime
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let collection = self.collection.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.lock();
            f(&conn, &collection)
        })
        .await
        .map_err(|e| StorageError::Internal(e.to_string()))?
    }
}

fn is_valid_collection(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn select_doc(
    conn: &Connection,
    collection: &str,
    id: &ObjectId,
) -> Result<Option<Teacher>, StorageError> {
    let doc: Option<String> = conn
        .query_row(
            &format!("SELECT doc FROM \"{collection}\" WHERE id = ?1"),
            params![id.to_hex()],
            |row| row.get(0),
        )
        .optional()?;

    doc.map(|doc| serde_json::from_str(&doc))
        .transpose()
        .map_err(StorageError::from)
}

#[async_trait]
impl TeacherStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn find_all(&self) -> Result<Vec<Teacher>, StorageError> {
        self.with_conn(|conn, collection| {
            let mut stmt = conn.prepare(&format!("SELECT doc FROM \"{collection}\" ORDER BY id"))?;
            let docs = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;

            docs.iter()
                .map(|doc| serde_json::from_str(doc).map_err(StorageError::from))
                .collect()
        })
        .await
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Teacher, StorageError> {
        let id = *id;
        self.with_conn(move |conn, collection| {
            select_doc(conn, collection, &id)?.ok_or(StorageError::NotFound(id))
        })
        .await
    }

    async fn create(&self, teacher: NewTeacher) -> Result<Teacher, StorageError> {
        let teacher = teacher.into_teacher(ObjectId::new());
        let doc = serde_json::to_string(&teacher)?;
        let id = teacher.id.to_hex();

        self.with_conn(move |conn, collection| {
            conn.execute(
                &format!("INSERT INTO \"{collection}\" (id, doc) VALUES (?1, ?2)"),
                params![id, doc],
            )?;
            Ok(())
        })
        .await?;

        Ok(teacher)
    }

    async fn save(&self, teacher: &Teacher) -> Result<Teacher, StorageError> {
        let doc = serde_json::to_string(teacher)?;
        let id = teacher.id;

        let changed = self
            .with_conn(move |conn, collection| {
                Ok(conn.execute(
                    &format!("UPDATE \"{collection}\" SET doc = ?2 WHERE id = ?1"),
                    params![id.to_hex(), doc],
                )?)
            })
            .await?;

        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(teacher.clone())
    }

    async fn remove(&self, teacher: &Teacher) -> Result<Teacher, StorageError> {
        let id = teacher.id;
        self.with_conn(move |conn, collection| {
            let tx = conn.unchecked_transaction()?;
            let stored = select_doc(&tx, collection, &id)?.ok_or(StorageError::NotFound(id))?;
            tx.execute(
                &format!("DELETE FROM \"{collection}\" WHERE id = ?1"),
                params![id.to_hex()],
            )?;
            tx.commit()?;
            Ok(stored)
        })
        .await
    }
}
