//! In-memory request cache with a flat time-to-live.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::entry::Entry;

/// Cache usage snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached requests.
    pub cached_requests: usize,
    /// Entries across all cached requests.
    pub total_cached_entries: usize,
    /// Time-to-live of each cached request.
    pub ttl: Duration,
}

/// Entry collections keyed by request, valid for `ttl` after storing.
#[derive(Debug)]
pub(crate) struct RequestCache {
    ttl: Duration,
    requests: RwLock<HashMap<String, (Instant, Vec<Entry>)>>,
}

impl RequestCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            requests: RwLock::new(HashMap::new()),
        }
    }

    /// Cache key of an entries request.
    pub(crate) fn key(content_type: &str, locale: &str, include: u32) -> String {
        format!("{content_type}:{locale}:{include}")
    }

    /// Cached entries for `key`, if stored less than `ttl` ago.
    pub(crate) fn get(&self, key: &str) -> Option<Vec<Entry>> {
        let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);
        let (stored_at, entries) = requests.get(key)?;
        (stored_at.elapsed() < self.ttl).then(|| entries.clone())
    }

    pub(crate) fn insert(&self, key: String, entries: Vec<Entry>) {
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, (Instant::now(), entries));
    }

    /// Drop every cached request, returning how many were removed.
    pub(crate) fn clear(&self) -> usize {
        let mut requests = self
            .requests
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let removed = requests.len();
        requests.clear();
        removed
    }

    pub(crate) fn stats(&self) -> CacheStats {
        let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            cached_requests: requests.len(),
            total_cached_entries: requests.values().map(|(_, entries)| entries.len()).sum(),
            ttl: self.ttl,
        }
    }
}
