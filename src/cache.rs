//! Per-source TTL cache.
//!
//! Entries are immutable `Arc` snapshots keyed by source key. A fetch
//! runs outside the map lock, so two concurrent refreshes of the same
//! expired key may race; last writer wins, which is fine because every
//! write is a complete replacement, never an in-place merge.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use anyhow::Result;
use metrics::counter;

use crate::model::NormalizedItem;

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Arc<Vec<NormalizedItem>>,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct SourceCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SourceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached snapshot for `key` if fresh and not forced;
    /// otherwise run `fetch_fn` and store its output. On fetch failure
    /// the existing entry (fresh or stale) is left untouched and the
    /// error propagates — the cache never swallows errors.
    pub async fn get<F, Fut>(&self, key: &str, force: bool, fetch_fn: F) -> Result<Arc<Vec<NormalizedItem>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<NormalizedItem>>>,
    {
        if !force {
            // Entries are replaced whole, never mutated under the lock,
            // so a poisoned lock still holds consistent data.
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = entries.get(key) {
                if entry.fetched_at.elapsed() < self.ttl {
                    counter!("cache_hits_total").increment(1);
                    return Ok(Arc::clone(&entry.data));
                }
            }
        }

        let data = Arc::new(fetch_fn().await?);
        counter!("cache_refreshes_total").increment(1);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            CacheEntry {
                data: Arc::clone(&data),
                fetched_at: Instant::now(),
            },
        );
        Ok(data)
    }
}
