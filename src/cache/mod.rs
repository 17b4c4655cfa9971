// Response caching hook.
// Wraps every GET so callers can plug in memoization; the default runs every request.

pub mod memory;

use std::future::Future;

use crate::error::Result;

pub use memory::{DEFAULT_TTL, MemoryCache};

/// Hook wrapped around every GET request, keyed by the full request URL.
pub trait ResponseCache: Send + Sync {
    /// Return a body for `key`, running `producer` when nothing usable is stored.
    fn cached<F, Fut>(&self, key: &str, producer: F) -> impl Future<Output = Result<String>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send;
}

/// No caching: every call runs the producer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl ResponseCache for PassThrough {
    fn cached<F, Fut>(&self, _key: &str, producer: F) -> impl Future<Output = Result<String>> + Send
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String>> + Send,
    {
        producer()
    }
}
