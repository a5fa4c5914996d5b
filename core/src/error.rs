//! Error types for the todo API client and the sync loop.
//!
//! # Design
//! `ApiError` keeps the detailed cause: `NotFound` gets a dedicated variant
//! because callers frequently distinguish "the resource does not exist" from
//! "the server returned an unexpected status", and transport failures are
//! split into `Transport` and `Timeout` for the logs. The sync loop collapses
//! all of them into a single [`RequestFailed`] kind tagged with the operation
//! that hit it; behaviour never branches on the cause.

use std::fmt;

use thiserror::Error;

/// Errors produced while building, executing or parsing a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server returned 404; the requested todo does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection refused, reset, DNS...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The request did not complete within the gateway's timeout.
    #[error("request timed out")]
    Timeout,
}

/// The sync loop operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Toggle,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Toggle => "toggle",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// The only error kind the sync loop reports. It is handed to the view's
/// diagnostics sink and never returned to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} request failed: {source}")]
pub struct RequestFailed {
    pub operation: Operation,
    #[source]
    pub source: ApiError,
}
