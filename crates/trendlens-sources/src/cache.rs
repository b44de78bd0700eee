//! Keyed TTL cache for source results.
//!
//! Entries live for a per-source TTL and are checked on read; a stale entry
//! is treated as absent but stays in the map until the next write to its key
//! overwrites it. There is no eviction and no size bound: the key population
//! is limited to the adapter-name × parameter-set combinations seen over the
//! process lifetime, which stays small in practice.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use trendlens_core::{ForumDiscussion, KeywordSuggestions, NewsArticle, TrendingTopic};

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

/// In-memory cache mapping string keys to values with a per-entry TTL.
///
/// Reads and writes go through a mutex so the cache can be shared across
/// concurrently running source tasks on a multi-threaded runtime.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Return the cached value for `key` if it is still within its TTL.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now()).await
    }

    /// Store `value` under `key`, unconditionally replacing any previous
    /// entry and restarting its TTL clock.
    pub async fn set(&self, key: &str, value: V, ttl: Duration) {
        self.set_at(key, value, ttl, Instant::now()).await;
    }

    async fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        if now.duration_since(entry.stored_at) < entry.ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    async fn set_at(&self, key: &str, value: V, ttl: Duration, now: Instant) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }
}

/// One typed cache per source list, owned by the aggregator.
#[derive(Default)]
pub struct TrendCache {
    pub(crate) suggestions: TtlCache<Vec<KeywordSuggestions>>,
    pub(crate) topics: TtlCache<Vec<TrendingTopic>>,
    pub(crate) discussions: TtlCache<Vec<ForumDiscussion>>,
    pub(crate) articles: TtlCache<Vec<NewsArticle>>,
}

impl TrendCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Derive a deterministic cache key from a keyword list.
///
/// Keywords are trimmed, lowercased, sorted, and deduplicated before
/// hashing, so set-equal lists produce the same key regardless of entry
/// order.
#[must_use]
pub fn keyword_cache_key(prefix: &str, keywords: &[String]) -> String {
    let mut normalized: Vec<String> = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    let joined = normalized.join("|");
    format!("{prefix}:{:x}", Sha256::digest(joined.as_bytes()))
}
