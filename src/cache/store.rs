//! Time-boxed store for rendered timeline pages.
//!
//! A hit inside the TTL returns the stored bytes verbatim, even when posts
//! have changed since. Concurrent misses on one key may each compute; the
//! last write wins. The lock is never held while computing, and a `clear`
//! that lands mid-compute discards the result instead of storing it.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use bytes::Bytes;
use lru::LruCache;
use metrics::counter;
use tracing::debug;

use crate::util::clock::Clock;

use super::config::CacheConfig;
use super::keys::{TimelineKey, TimelineView};
use super::lock::mutex_lock;

const SOURCE: &str = "cache::store";

#[derive(Clone)]
struct CachedPage {
    body: Bytes,
    stored_at: Instant,
}

pub struct TimelineCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    entries: Mutex<LruCache<TimelineKey, CachedPage>>,
    /// Bumped by `clear`, under the entries lock.
    generation: AtomicU64,
}

impl TimelineCache {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let capacity = config.max_entries_non_zero();
        Self {
            config,
            clock,
            entries: Mutex::new(LruCache::new(capacity)),
            generation: AtomicU64::new(0),
        }
    }

    /// Key for `view` at `page`, honoring `key_by_page`. Pages past
    /// `max_page` get no key and are rendered without the cache.
    pub fn key_for(&self, view: TimelineView, page: usize) -> Option<TimelineKey> {
        if !self.config.key_by_page {
            return Some(TimelineKey::shared(view));
        }
        (page <= self.config.max_page).then(|| TimelineKey::paged(view, page))
    }

    /// Return the stored body if it is still inside the TTL.
    pub fn get(&self, key: &TimelineKey) -> Option<Bytes> {
        if !self.config.enabled {
            return None;
        }

        let now = self.clock.instant();
        let mut entries = mutex_lock(&self.entries, SOURCE, "get");
        let Some(entry) = entries.get(key) else {
            counter!("yatube_timeline_cache_miss_total").increment(1);
            return None;
        };

        if now.saturating_duration_since(entry.stored_at) >= self.config.ttl() {
            entries.pop(key);
            counter!("yatube_timeline_cache_expired_total").increment(1);
            counter!("yatube_timeline_cache_miss_total").increment(1);
            debug!(cache = "timeline", outcome = "expired", key = ?key, "cached page expired");
            return None;
        }

        counter!("yatube_timeline_cache_hit_total").increment(1);
        Some(entry.body.clone())
    }

    pub fn put(&self, key: TimelineKey, body: Bytes) {
        if !self.config.enabled {
            return;
        }
        self.put_if_current(key, body, self.generation.load(Ordering::SeqCst));
    }

    /// Store `body` unless `clear` ran after `generation` was read.
    fn put_if_current(&self, key: TimelineKey, body: Bytes, generation: u64) -> bool {
        let entry = CachedPage {
            body,
            stored_at: self.clock.instant(),
        };
        let mut entries = mutex_lock(&self.entries, SOURCE, "put");
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        let evicted = entries.push(key, entry);
        drop(entries);

        if let Some((evicted_key, _)) = evicted
            && evicted_key != key
        {
            counter!("yatube_timeline_cache_evict_total").increment(1);
            debug!(cache = "timeline", evicted = ?evicted_key, "evicted cached page");
        }
        true
    }

    /// Serve `key` from the cache, or run `compute` and store its output.
    /// Errors from `compute` are returned and nothing is stored.
    pub async fn get_or_compute<F, Fut, E>(&self, key: TimelineKey, compute: F) -> Result<Bytes, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, E>>,
    {
        if !self.config.enabled {
            return compute().await;
        }
        if let Some(body) = self.get(&key) {
            debug!(cache = "timeline", outcome = "hit", key = ?key, "serving cached page");
            return Ok(body);
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let body = compute().await?;
        if self.put_if_current(key, body.clone(), generation) {
            debug!(cache = "timeline", outcome = "miss", key = ?key, "stored rendered page");
        } else {
            debug!(
                cache = "timeline",
                outcome = "discarded",
                key = ?key,
                "cache cleared while rendering"
            );
        }
        Ok(body)
    }

    /// Drop every entry regardless of age.
    pub fn clear(&self) {
        let mut entries = mutex_lock(&self.entries, SOURCE, "clear");
        self.generation.fetch_add(1, Ordering::SeqCst);
        entries.clear();
        drop(entries);
        debug!(cache = "timeline", "cleared all cached pages");
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
