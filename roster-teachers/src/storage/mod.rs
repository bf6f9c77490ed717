//! Teacher storage backends

mod ephemeral;
mod sqlite;
mod traits;

#[cfg(test)]
mod tests;

pub use ephemeral::EphemeralStore;
pub use sqlite::SqliteStore;
pub use traits::{StorageError, TeacherStore};
