//! HTTP-agnostic API layer
//!
//! This module provides typed request/response structures and pure business
//! logic handlers that the `tiny_http` adapter in [`crate::server`] routes to.
//!
//! ## Design
//!
//! - **Handlers are pure functions**: Take the store and typed input, return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: No HTTP types leak into this module
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for translation

mod error;
mod handlers;
mod policy;
mod types;

pub use error::{ApiError, ApiErrorData, ErrorCode};
pub use handlers::{create_item, delete_item, list_items, replace_item};
pub use policy::{ApiPolicy, MissingDelete, MutationStatus};
pub use types::{CreateItemRequest, EmptyBody, ItemView, ReplaceItemRequest};
