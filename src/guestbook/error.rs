use thiserror::Error;

use crate::store::StoreError;

/// Failures of guestbook operations, independent of the HTTP layer
#[derive(Debug, Error)]
pub enum GuestbookError {
    /// Missing, oversized or malformed input
    #[error("{0}")]
    Validation(String),

    /// Bad admin secret or IP mismatch
    #[error("{0}")]
    Forbidden(String),

    #[error("Entry not found")]
    NotFound,

    #[error("could not generate an unused entry key")]
    KeyExhausted,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("entry serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuestbookError {
    pub fn validation(message: impl Into<String>) -> Self {
        GuestbookError::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        GuestbookError::Forbidden(message.into())
    }
}
