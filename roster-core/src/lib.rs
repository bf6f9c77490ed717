//! Core types for Roster
//!
//! This crate provides the identifier, error and request-id types used by
//! every Roster service crate.

pub mod error;
pub mod object_id;
pub mod request_id;

pub use error::{ApiError, ErrorCode};
pub use object_id::{InvalidObjectId, ObjectId};
pub use request_id::{RequestId, REQUEST_ID_HEADER};
