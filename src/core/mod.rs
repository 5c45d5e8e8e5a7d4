//! Core domain logic for the shopping list
//!
//! This module contains the item model and the store port. It performs no
//! I/O itself; persistence is reached through the [`ports::ItemStore`] trait.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Item, ItemId, ItemName, id generation)
//! - `ports/` - Trait definitions for external dependencies

pub mod models;
pub mod ports;
