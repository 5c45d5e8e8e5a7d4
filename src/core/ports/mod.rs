//! Port traits (interfaces) for external dependencies
//!
//! The request handlers depend only on these traits, never on a concrete
//! backend. Implementations live in the `adapters` module.

mod item_store;

pub use item_store::{ItemStore, StoreError};
