//! Conformance tests shared by every storage backend

use super::*;
use crate::model::{NewTeacher, Teacher};
use roster_core::ObjectId;

fn new_teacher(name: &str) -> NewTeacher {
    NewTeacher {
        teacher_id: Some(1),
        name: Some(name.to_string()),
        lastname: Some("mustillo".to_string()),
        title: Some("assistant".to_string()),
        age: Some(21),
        is_full_time: Some(false),
        ..NewTeacher::default()
    }
}

macro_rules! store_suite {
    ($name:ident, $make:expr) => {
        mod $name {
            use super::*;

            fn store() -> impl TeacherStore {
                $make
            }

            #[tokio::test]
            async fn test_create_assigns_id() {
                let s = store();
                let created = s.create(new_teacher("vin")).await.unwrap();

                assert_eq!(created.name.as_deref(), Some("vin"));
                assert_eq!(s.find_by_id(&created.id).await.unwrap(), created);
            }

            #[tokio::test]
            async fn test_create_ids_are_distinct() {
                let s = store();
                let a = s.create(new_teacher("a")).await.unwrap();
                let b = s.create(new_teacher("a")).await.unwrap();

                assert_ne!(a.id, b.id);
            }

            #[tokio::test]
            async fn test_find_all_empty() {
                let s = store();
                assert!(s.find_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_find_all_in_identifier_order() {
                let s = store();
                let mut created = Vec::new();
                for name in ["a", "b", "c", "d"] {
                    created.push(s.create(new_teacher(name)).await.unwrap());
                }
                created.sort_by_key(|t| t.id);

                assert_eq!(s.find_all().await.unwrap(), created);
            }

            #[tokio::test]
            async fn test_find_by_id_not_found() {
                let s = store();
                s.create(new_teacher("vin")).await.unwrap();

                let missing = ObjectId::new();
                let result = s.find_by_id(&missing).await;
                assert!(matches!(result, Err(StorageError::NotFound(id)) if id == missing));
            }

            #[tokio::test]
            async fn test_save_overwrites() {
                let s = store();
                let mut teacher = s.create(new_teacher("vin")).await.unwrap();

                teacher.age = Some(30);
                teacher.title = None;
                let saved = s.save(&teacher).await.unwrap();
                assert_eq!(saved, teacher);

                let stored = s.find_by_id(&teacher.id).await.unwrap();
                assert_eq!(stored.age, Some(30));
                assert_eq!(stored.title, None);
                assert_eq!(s.find_all().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_save_missing_record() {
                let s = store();
                let ghost = new_teacher("ghost").into_teacher(ObjectId::new());

                let result = s.save(&ghost).await;
                assert!(matches!(result, Err(StorageError::NotFound(_))));
                assert!(s.find_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_remove_returns_last_state() {
                let s = store();
                let mut teacher = s.create(new_teacher("vin")).await.unwrap();
                teacher.age = Some(40);
                s.save(&teacher).await.unwrap();

                // Stale copy: remove still reports what was stored
                let stale = Teacher { age: Some(1), ..teacher.clone() };
                let removed = s.remove(&stale).await.unwrap();
                assert_eq!(removed, teacher);

                assert!(s.find_by_id(&teacher.id).await.unwrap_err().is_not_found());
            }

            #[tokio::test]
            async fn test_remove_twice() {
                let s = store();
                let teacher = s.create(new_teacher("vin")).await.unwrap();

                s.remove(&teacher).await.unwrap();
                let result = s.remove(&teacher).await;
                assert!(matches!(result, Err(StorageError::NotFound(_))));
            }

            #[tokio::test]
            async fn test_remove_leaves_others() {
                let s = store();
                let keep = s.create(new_teacher("keep")).await.unwrap();
                let gone = s.create(new_teacher("gone")).await.unwrap();

                s.remove(&gone).await.unwrap();
                assert_eq!(s.find_all().await.unwrap(), vec![keep]);
            }
        }
    };
}

store_suite!(ephemeral, EphemeralStore::new());
store_suite!(sqlite, SqliteStore::open_in_memory("teachers").unwrap());

// =============================================================================
// BACKEND SPECIFIC
// =============================================================================

#[tokio::test]
async fn test_ephemeral_len() {
    let s = EphemeralStore::new();
    assert!(s.is_empty());
    assert_eq!(s.backend(), "ephemeral");

    let first = s.create(new_teacher("vin")).await.unwrap();
    s.create(new_teacher("kel")).await.unwrap();
    assert_eq!(s.len(), 2);

    s.remove(&first).await.unwrap();
    assert_eq!(s.len(), 1);
    assert!(!s.is_empty());
}

#[test]
fn test_sqlite_rejects_bad_collection() {
    for name in ["", "teachers; DROP TABLE x", "a-b", "t\""] {
        let result = SqliteStore::open_in_memory(name);
        assert!(
            matches!(result, Err(StorageError::InvalidCollection(_))),
            "{name:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_sqlite_persists_across_reopen() {
    let path = std::env::temp_dir().join(format!("roster-test-{}.db", ObjectId::new()));

    let created = {
        let s = SqliteStore::open(&path, "teachers").unwrap();
        s.create(new_teacher("vin")).await.unwrap()
    };

    let s = SqliteStore::open(&path, "teachers").unwrap();
    assert_eq!(s.collection(), "teachers");
    assert_eq!(s.find_by_id(&created.id).await.unwrap(), created);

    // Collections are isolated
    let other = SqliteStore::open(&path, "archived").unwrap();
    assert!(other.find_all().await.unwrap().is_empty());

    drop(s);
    drop(other);
    let _ = std::fs::remove_file(&path);
}
