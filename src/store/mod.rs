pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Errors raised by a key-value backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    Backend(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// One page of a key listing. `cursor` is `None` once enumeration is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    pub keys: Vec<String>,
    pub cursor: Option<String>,
}

/// Narrow key-value contract the guestbook is built on.
///
/// Values are opaque strings (serialized JSON entries). Listing is
/// cursor-paginated and callers are expected to drain every page.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// List keys starting with `prefix`, resuming after `cursor` when given
    async fn list(&self, prefix: &str, cursor: Option<String>) -> Result<KeyPage, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Liveness probe used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
