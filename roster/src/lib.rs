//! Roster - teachers REST service
//!
//! Wires the teacher collection into an HTTP application: configuration,
//! storage selection, the application router and its middleware.

pub mod app;
pub mod cli;
pub mod config;

pub use app::{create_router, open_store};
pub use config::Config;
