//! Timeline cache configuration.
//!
//! Controlled via the `[cache]` table of `yatube.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TTL_SECONDS: u64 = 20;
const DEFAULT_MAX_ENTRIES: usize = 64;
const DEFAULT_MAX_PAGE: usize = 32;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false every read renders afresh.
    pub enabled: bool,
    /// How long a rendered page is served before it is recomputed.
    pub ttl_seconds: u64,
    /// Maximum rendered pages held at once.
    pub max_entries: usize,
    /// Pages past this number are rendered without the cache.
    pub max_page: usize,
    /// Key entries by requested page number; when false all pages share one entry.
    pub key_by_page: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            max_entries: DEFAULT_MAX_ENTRIES,
            max_page: DEFAULT_MAX_PAGE,
            key_by_page: true,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl_seconds: settings.ttl.as_secs(),
            max_entries: settings.max_entries.get(),
            max_page: settings.max_page.get(),
            key_by_page: settings.key_by_page,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }

    /// Returns the entry limit as NonZeroUsize, clamping to 1 if zero.
    pub fn max_entries_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.max_entries).unwrap_or(NonZeroUsize::MIN)
    }
}
