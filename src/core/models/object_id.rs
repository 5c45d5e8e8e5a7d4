//! Identifier generation for new items
//!
//! Ids follow the 12-byte object id layout used by document stores,
//! rendered as 24 lowercase hex characters:
//!
//! ```text
//! | 4 bytes unix seconds | 5 bytes process discriminator | 3 bytes counter |
//! ```
//!
//! The discriminator is fixed per generator and the counter increments per
//! id, so ids from one generator never repeat within a second.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

use super::item::ItemId;

const DISCRIMINATOR_MASK: u64 = 0xFF_FFFF_FFFF;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Generates object-id style identifiers
#[derive(Debug)]
pub struct ObjectIdGenerator {
    discriminator: u64,
    counter: AtomicU32,
}

impl ObjectIdGenerator {
    /// Create a generator seeded from the process id and the current time
    #[must_use]
    pub fn new() -> Self {
        let mut hasher = DefaultHasher::new();
        std::process::id().hash(&mut hasher);
        chrono::Utc::now().timestamp_nanos_opt().hash(&mut hasher);
        let seed = hasher.finish();
        Self::with_seed(seed)
    }

    /// Create a generator from an explicit seed
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let start = u32::try_from(seed >> 40).unwrap_or(0) & COUNTER_MASK;
        Self {
            discriminator: seed & DISCRIMINATOR_MASK,
            counter: AtomicU32::new(start),
        }
    }

    /// Produce the next identifier
    pub fn next_id(&self) -> ItemId {
        let seconds = u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        let hex = format!("{seconds:08x}{:010x}{count:06x}", self.discriminator);
        ItemId::from_generated(hex)
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
