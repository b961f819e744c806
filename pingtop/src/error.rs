//! The single error kind callers of the API client ever see.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Rejected locally, before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// A 2xx answer without the expected payload.
    #[error("{0}")]
    InvalidResponse(String),

    /// A non-2xx answer. `message` comes from the body when it carries one.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Unreachable backend, TLS failure, unreadable body.
    #[error("network error: {0}")]
    Network(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
