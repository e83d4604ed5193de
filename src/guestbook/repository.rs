use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};
use tracing::warn;
use uuid::Uuid;

use super::error::GuestbookError;
use super::models::{Entry, StoredEntry};
use crate::store::{EntryStore, StoreError};

const MAX_KEY_ATTEMPTS: usize = 5;

/// The only component that talks to the key-value store.
///
/// Adds key generation and JSON (de)serialization on top of the raw
/// [`EntryStore`] contract.
#[derive(Clone)]
pub struct EntryRepository {
    store: Arc<dyn EntryStore>,
    prefix: String,
}

impl EntryRepository {
    pub fn new(store: Arc<dyn EntryStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    /// Lazily walk every key under the prefix, fetching pages on demand.
    ///
    /// Each call starts a fresh enumeration from the first page.
    pub fn keys(&self) -> impl Stream<Item = Result<String, StoreError>> + Send + '_ {
        // `None` state means the previous page was the last one
        stream::try_unfold(Some(None::<String>), move |state| async move {
            let cursor = match state {
                Some(cursor) => cursor,
                None => return Ok(None),
            };
            let page = self.store.list(&self.prefix, cursor).await?;
            let next = page.cursor.map(Some);
            Ok::<_, StoreError>(Some((stream::iter(page.keys.into_iter().map(Ok::<String, StoreError>)), next)))
        })
        .try_flatten()
    }

    /// Fully drain the listing and load every entry behind it.
    ///
    /// Keys that vanish between list and get are skipped, as are records that
    /// no longer decode.
    pub async fn list_entries(&self) -> Result<Vec<StoredEntry>, GuestbookError> {
        let keys: Vec<String> = self.keys().try_collect().await?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(raw) = self.store.get(&key).await? else {
                continue;
            };
            match serde_json::from_str::<Entry>(&raw) {
                Ok(entry) => entries.push(StoredEntry { key, entry }),
                Err(e) => warn!("Skipping undecodable guestbook record {}: {}", key, e),
            }
        }
        Ok(entries)
    }

    pub async fn get(&self, key: &str) -> Result<Option<Entry>, GuestbookError> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Like [`EntryRepository::get`], but an absent key is `NotFound`
    pub async fn get_404(&self, key: &str) -> Result<Entry, GuestbookError> {
        self.get(key).await?.ok_or(GuestbookError::NotFound)
    }

    pub async fn put(&self, key: &str, entry: &Entry) -> Result<(), GuestbookError> {
        let raw = serde_json::to_string(entry)?;
        self.store.put(key, raw).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), GuestbookError> {
        self.store.delete(key).await?;
        Ok(())
    }

    /// Generate a key not currently present in the store
    pub async fn fresh_key(&self) -> Result<String, GuestbookError> {
        for _ in 0..MAX_KEY_ATTEMPTS {
            let key = format!("{}{}", self.prefix, Uuid::new_v4().simple());
            if self.store.get(&key).await?.is_none() {
                return Ok(key);
            }
            warn!("Generated guestbook key {} already exists, retrying", key);
        }
        Err(GuestbookError::KeyExhausted)
    }
}
