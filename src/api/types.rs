//! API request and response types
//!
//! Request bodies are decoded into these per-operation schemas and then
//! validated into domain values before any store call.

use serde::{Deserialize, Serialize};

use crate::core::models::{Item, ItemId, ItemName};

use super::error::ApiError;

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Request body for `POST /items`
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Item name
    #[serde(default)]
    pub name: Option<String>,
    /// Must be absent: the store assigns ids. Any JSON type is captured so
    /// that its presence can be rejected.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
}

impl CreateItemRequest {
    /// Validate the request into the name to create
    pub fn validate(self) -> Result<ItemName, ApiError> {
        if self.id.is_some() {
            return Err(ApiError::bad_request("Item id must not be supplied on create"));
        }
        let name = self.name.ok_or_else(|| ApiError::bad_request("Item name is required"))?;
        Ok(ItemName::parse(name)?)
    }
}

/// Request body for `PUT /items/{id}`
#[derive(Debug, Deserialize)]
pub struct ReplaceItemRequest {
    /// Item id, must equal the path id
    #[serde(default)]
    pub id: Option<String>,
    /// New name
    #[serde(default)]
    pub name: Option<String>,
}

impl ReplaceItemRequest {
    /// Validate the request against the id taken from the route
    pub fn validate(self, path_id: &ItemId) -> Result<ItemName, ApiError> {
        let id = self.id.ok_or_else(|| ApiError::bad_request("Item id is required"))?;
        if id != path_id.as_str() {
            return Err(ApiError::bad_request(format!(
                "Body id '{id}' does not match path id '{path_id}'"
            )));
        }
        let name = self.name.ok_or_else(|| ApiError::bad_request("Item name is required"))?;
        Ok(ItemName::parse(name)?)
    }
}

// =============================================================================
// RESPONSE DATA TYPES
// =============================================================================

/// External shape of an item: `{"id", "name"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    /// Item id
    pub id: String,
    /// Item name
    pub name: String,
}

impl From<Item> for ItemView {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.into(),
            name: item.name.into(),
        }
    }
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.as_str().to_string(),
            name: item.name.as_str().to_string(),
        }
    }
}

/// Empty JSON object body, `{}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmptyBody {}
