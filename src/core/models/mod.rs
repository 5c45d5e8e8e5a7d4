//! Domain models
//!
//! Pure data types with no I/O dependencies.

mod item;
mod object_id;

pub use item::{Item, ItemError, ItemId, ItemName};
pub use object_id::ObjectIdGenerator;
