//! Yatube timeline cache
//!
//! Rendered home timeline pages are kept for a fixed TTL (20 seconds by
//! default) and served verbatim until they expire or the cache is cleared.
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 20
//! max_entries = 64
//! key_by_page = true
//! ```

mod config;
mod keys;
mod lock;
mod store;

pub use config::CacheConfig;
pub use keys::{TimelineKey, TimelineView};
pub use store::TimelineCache;
