//! Pure API handlers
//!
//! These handlers contain the business logic and are HTTP-agnostic.
//! They take the store plus typed input and return `Result<T, ApiError>`.
//! Validation always runs before the first store call, so a rejected
//! request never touches the collection.

use crate::core::models::ItemId;
use crate::core::ports::ItemStore;

use super::error::ApiError;
use super::policy::MissingDelete;
use super::types::{CreateItemRequest, ItemView, ReplaceItemRequest};

/// List all items
pub fn list_items(store: &dyn ItemStore) -> Result<Vec<ItemView>, ApiError> {
    let items = store.find_all()?;
    Ok(items.iter().map(ItemView::from).collect())
}

/// Create a new item with a store-assigned id
pub fn create_item(store: &dyn ItemStore, req: CreateItemRequest) -> Result<ItemView, ApiError> {
    let name = req.validate()?;
    let item = store.create(&name)?;
    Ok(ItemView::from(item))
}

/// Replace the name of the item at `id`, creating it if absent
pub fn replace_item(
    store: &dyn ItemStore,
    id: &str,
    req: ReplaceItemRequest,
) -> Result<ItemView, ApiError> {
    let id = path_id(id)?;
    let name = req.validate(&id)?;
    let item = store.upsert_by_id(&id, &name)?;
    Ok(ItemView::from(item))
}

/// Delete the item at `id`
///
/// Returns the removed item if there was one. Deleting a missing id is a
/// success or a not-found error depending on `missing`.
pub fn delete_item(
    store: &dyn ItemStore,
    id: &str,
    missing: MissingDelete,
) -> Result<Option<ItemView>, ApiError> {
    let id = path_id(id)?;
    match store.delete_by_id(&id)? {
        Some(item) => Ok(Some(ItemView::from(item))),
        None if missing == MissingDelete::NotFound => {
            Err(ApiError::not_found(format!("Item '{id}' not found")))
        },
        None => Ok(None),
    }
}

// An empty id segment is a routing miss, not a malformed body.
fn path_id(raw: &str) -> Result<ItemId, ApiError> {
    ItemId::parse(raw).map_err(|_| ApiError::not_found("Missing item id in path"))
}
