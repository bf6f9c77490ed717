//! API error types and formatting

use serde::Serialize;
use thiserror::Error;

use crate::request_id::RequestId;

/// Error codes surfaced by the HTTP API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Caller input
    InvalidIdentifier,
    MalformedBody,

    // Lookup
    NotFound,
    ReadFailed,

    // Mutation
    SaveFailed,
    RemoveFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "InvalidIdentifier",
            Self::MalformedBody => "MalformedBody",
            Self::NotFound => "NotFound",
            Self::ReadFailed => "ReadFailed",
            Self::SaveFailed => "SaveFailed",
            Self::RemoveFailed => "RemoveFailed",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidIdentifier | Self::MalformedBody => 400,
            Self::NotFound => 404,
            Self::ReadFailed | Self::SaveFailed | Self::RemoveFailed => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned to HTTP callers
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub resource: Option<String>,
    pub request_id: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            resource: None,
            request_id: RequestId::current().unwrap_or_default().id,
        }
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Format as the JSON error body
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct JsonError<'a> {
            error: &'static str,
            message: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            resource: Option<&'a str>,
            request_id: &'a str,
        }

        let error = JsonError {
            error: self.code.as_str(),
            message: &self.message,
            resource: self.resource.as_deref(),
            request_id: &self.request_id,
        };

        serde_json::to_string(&error).unwrap_or_else(|_| {
            format!(r#"{{"error":"{}","message":"{}"}}"#, self.code.as_str(), self.message)
        })
    }
}
