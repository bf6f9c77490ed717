//! Request ID generation
//!
//! The HTTP layer runs each request inside [`RequestId::scope`], so errors
//! built anywhere below it pick up the same id via [`RequestId::current`].

use std::fmt;
use std::future::Future;
use uuid::Uuid;

/// Header carrying the request id in both directions
pub const REQUEST_ID_HEADER: &str = "x-request-id";

tokio::task_local! {
    static CURRENT: RequestId;
}

/// Per-request correlation id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId {
    pub id: String,
}

impl RequestId {
    /// Generate a new request ID
    pub fn new() -> Self {
        let id = Uuid::new_v4().simple().to_string().to_uppercase();
        Self { id }
    }

    /// Wrap an id supplied by the caller (or a test)
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Run `fut` with `id` as the current request id
    pub async fn scope<F: Future>(id: RequestId, fut: F) -> F::Output {
        CURRENT.scope(id, fut).await
    }

    /// The id of the request being served, if any
    pub fn current() -> Option<RequestId> {
        CURRENT.try_with(Clone::clone).ok()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_generation() {
        let id1 = RequestId::new();
        let id2 = RequestId::new();

        assert_ne!(id1, id2);
        assert_eq!(id1.id.len(), 32);
        assert!(id1
            .id
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[tokio::test]
    async fn test_scope_sets_current() {
        assert!(RequestId::current().is_none());

        let seen = RequestId::scope(RequestId::with_id("scoped"), async {
            RequestId::current()
        })
        .await;

        assert_eq!(seen, Some(RequestId::with_id("scoped")));
        assert!(RequestId::current().is_none());
    }

    #[test]
    fn test_request_id_with_id() {
        let id = RequestId::with_id("test-id-123");
        assert_eq!(id.as_str(), "test-id-123");
        assert_eq!(id.to_string(), "test-id-123");
    }
}
