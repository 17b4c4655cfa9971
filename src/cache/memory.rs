// In-memory response cache.
// Memoizes response bodies per request URL until a fixed TTL runs out.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

use crate::error::Result;

use super::ResponseCache;

/// Default TTL for cached responses: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Stored response body.
#[derive(Debug, Clone)]
struct Entry {
    body: String,
    stored_at: DateTime<Utc>,
}

/// Cache that keeps successful responses in memory for a fixed time.
///
/// Expired entries are evicted on lookup and whenever a new body is stored, so keys that
/// are never requested again (per-request defaults end up in the URL) do not pile up.
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries. Expired ones count until the next store or lookup of them.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entries stored in the future (clock moved back) count as expired.
    fn is_fresh(&self, entry: &Entry, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(entry.stored_at);
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        age >= TimeDelta::zero() && age <= ttl
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let now = Utc::now();
        let mut entries = self.lock();
        if let Some(entry) = entries.get(key).filter(|entry| self.is_fresh(entry, now)) {
            return Some(entry.body.clone());
        }
        entries.remove(key);
        None
    }

    fn store(&self, key: &str, body: &str) {
        let now = Utc::now();
        let mut entries = self.lock();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        entries.insert(
            key.to_string(),
            Entry {
                body: body.to_string(),
                stored_at: now,
            },
        );
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache for MemoryCache {
    async fn cached<F, Fut>(&self, key: &str, producer: F) -> Result<String>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send,
    {
        if let Some(body) = self.lookup(key) {
            trace!(key, "cache hit");
            return Ok(body);
        }

        trace!(key, "cache miss");
        let body = producer().await?;
        self.store(key, &body);
        Ok(body)
    }
}
