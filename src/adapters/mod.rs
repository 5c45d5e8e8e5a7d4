//! Adapter implementations for port traits
//!
//! This module contains concrete `ItemStore` backends:
//!
//! - `memory` - process-local collection (`memory:`)
//! - `file` - JSON document file (`file://path` or a bare path)

mod file;
mod memory;

use std::sync::Arc;

pub use file::FileItemStore;
pub use memory::MemoryItemStore;

use crate::core::ports::{ItemStore, StoreError};

/// Open the store named by a connection string
pub fn connect(url: &str) -> Result<Arc<dyn ItemStore>, StoreError> {
    let url = url.trim();
    match url {
        "memory" | "memory:" | "memory://" => {
            log::debug!("Using in-memory item store");
            return Ok(Arc::new(MemoryItemStore::new()));
        },
        "" => return Err(StoreError::UnsupportedUrl(url.to_string())),
        _ => {},
    }

    let path = match url.strip_prefix("file://") {
        Some(path) if !path.is_empty() => path,
        Some(_) => return Err(StoreError::UnsupportedUrl(url.to_string())),
        None if url.contains("://") => return Err(StoreError::UnsupportedUrl(url.to_string())),
        None => url,
    };

    let store = FileItemStore::open(path)?;
    log::debug!("Using item file {}", store.path().display());
    Ok(Arc::new(store))
}
