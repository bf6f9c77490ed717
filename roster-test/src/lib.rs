//! Test utilities for Roster
//!
//! Provides utilities for integration testing with Roster:
//! - Start the service in-process on a random port
//! - Swap in any [`TeacherStore`](roster_teachers::TeacherStore)
//! - Client helpers for the teacher endpoints
//!
//! ## Usage
//!
//! ```rust,no_run
//! use roster_test::TestServer;
//!
//! #[tokio::test]
//! async fn test_teachers() {
//!     let server = TestServer::start().await.unwrap();
//!     let client = server.client();
//!
//!     let created = client.create(&serde_json::json!({"name": "Ada"})).await.unwrap();
//!     assert_eq!(created.status, 201);
//! }
//! ```

pub mod client;
pub mod server;

pub use client::{ClientError, RosterClient, RosterResponse};
pub use server::{TestError, TestServer};

/// Timeout for a single client request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
