//! Error types for the chat API client.
//!
//! # Design
//! The client does not interpret status codes beyond "2xx or not". Any
//! other status lands in `Http` with the raw code and body so the caller
//! decides what a 404 or a 500 means for the UI.

use thiserror::Error;

use crate::http::TransportError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The transport failed before a response was received.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Status code of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
