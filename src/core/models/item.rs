//! Item domain types
//!
//! An [`Item`] is the only resource the service manages: an immutable
//! identifier plus a mutable, non-empty name. Both fields are newtypes whose
//! constructors enforce the non-empty invariant, so a value that exists has
//! already been validated.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing item fields from raw input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ItemError {
    /// The name was empty or whitespace only
    #[error("item name cannot be empty")]
    EmptyName,

    /// The identifier was empty
    #[error("item id cannot be empty")]
    EmptyId,
}

/// Opaque unique identifier of an item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Parse an identifier, rejecting the empty string
    pub fn parse(raw: impl Into<String>) -> Result<Self, ItemError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ItemError::EmptyId);
        }
        Ok(Self(raw))
    }

    /// Wrap a generator-produced id, which is never empty
    pub(crate) const fn from_generated(raw: String) -> Self {
        Self(raw)
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display label of an item
///
/// Stored exactly as supplied; only blank names are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    /// Parse a name, rejecting empty and whitespace-only input
    pub fn parse(raw: impl Into<String>) -> Result<Self, ItemError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(ItemError::EmptyName);
        }
        Ok(Self(raw))
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<ItemName> for String {
    fn from(name: ItemName) -> Self {
        name.0
    }
}

impl fmt::Display for ItemName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted shopping-list item
///
/// This is the store-native record: it serializes with the document
/// store's `_id` key. The external `{id, name}` shape lives in the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier assigned by the store (or by an upsert)
    #[serde(rename = "_id")]
    pub id: ItemId,
    /// Current name
    pub name: ItemName,
}

impl Item {
    /// Create an item from already validated parts
    #[must_use]
    pub const fn new(id: ItemId, name: ItemName) -> Self {
        Self { id, name }
    }
}
