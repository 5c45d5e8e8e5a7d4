//! Item store port
//!
//! Defines the interface the request handlers use to persist items.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::models::{Item, ItemId, ItemName};

/// Errors raised by item store backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("io error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The backing file does not contain a valid document collection
    #[error("corrupt document file {path}: {source}")]
    Corrupt {
        /// File being parsed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be serialized
    #[error("failed to serialize documents: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A thread panicked while holding the store lock
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The connection string names a backend this build does not provide
    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

/// Persistent collection of items
///
/// Each operation is atomic with respect to the others on the same store.
/// Nothing is ordered across concurrent callers: the last write wins.
pub trait ItemStore: Send + Sync + fmt::Debug {
    /// Fetch every item in the collection
    fn find_all(&self) -> Result<Vec<Item>, StoreError>;

    /// Insert a new item under a freshly generated id
    fn create(&self, name: &ItemName) -> Result<Item, StoreError>;

    /// Set the name of the item with `id`, inserting it if absent
    fn upsert_by_id(&self, id: &ItemId, name: &ItemName) -> Result<Item, StoreError>;

    /// Remove the item with `id`
    ///
    /// Returns the removed item, or `None` if nothing matched.
    fn delete_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError>;

    /// Release the backend at shutdown
    fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
