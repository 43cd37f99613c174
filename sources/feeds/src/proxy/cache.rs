//! Short-lived cache of parsed feeds, keyed by feed URL

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::FeedItem;

/// TTL cache with hit/miss tracking
pub struct FeedCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Arc<Vec<FeedItem>>)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a fresh entry, dropping it if it has expired
    pub fn get(&self, url: &str) -> Option<Arc<Vec<FeedItem>>> {
        let mut entries = self.entries.lock();
        let fresh = entries
            .get(url)
            .filter(|(stored, _)| stored.elapsed() < self.ttl)
            .map(|(_, items)| items.clone());
        if fresh.is_none() {
            entries.remove(url);
        }

        let counter = if fresh.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        fresh
    }

    /// Store a parsed feed, sweeping out every expired entry first
    pub fn insert(&self, url: &str, items: Arc<Vec<FeedItem>>) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.lock();
        entries.retain(|_, (stored, _)| stored.elapsed() < self.ttl);
        entries.insert(url.to_string(), (Instant::now(), items));
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.entries.lock().len(),
        }
    }
}

/// Cache statistics
#[derive(Clone, Debug, serde::Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}
