//! In-memory item store
//!
//! Implements the `ItemStore` port over a locked vector. Used by tests and
//! by `memory:` connection strings; contents vanish with the process.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::models::{Item, ItemId, ItemName, ObjectIdGenerator};
use crate::core::ports::{ItemStore, StoreError};

/// Item store held entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: RwLock<Vec<Item>>,
    ids: ObjectIdGenerator,
}

impl MemoryItemStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with items, kept in the given order
    #[must_use]
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items),
            ids: ObjectIdGenerator::new(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Item>>, StoreError> {
        self.items.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Item>>, StoreError> {
        self.items.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl ItemStore for MemoryItemStore {
    fn find_all(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.clone())
    }

    fn create(&self, name: &ItemName) -> Result<Item, StoreError> {
        let mut items = self.write()?;
        let mut id = self.ids.next_id();
        // An upsert may already have claimed this id.
        while items.iter().any(|item| item.id == id) {
            id = self.ids.next_id();
        }
        let item = Item::new(id, name.clone());
        items.push(item.clone());
        Ok(item)
    }

    fn upsert_by_id(&self, id: &ItemId, name: &ItemName) -> Result<Item, StoreError> {
        let mut items = self.write()?;
        if let Some(existing) = items.iter_mut().find(|item| &item.id == id) {
            existing.name = name.clone();
            return Ok(existing.clone());
        }
        let item = Item::new(id.clone(), name.clone());
        items.push(item.clone());
        Ok(item)
    }

    fn delete_by_id(&self, id: &ItemId) -> Result<Option<Item>, StoreError> {
        let mut items = self.write()?;
        Ok(items.iter().position(|item| &item.id == id).map(|index| items.remove(index)))
    }
}
