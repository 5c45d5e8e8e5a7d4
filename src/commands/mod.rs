//! Command implementations

mod items;
mod serve;

pub use items::{list, seed};
pub use serve::serve;
