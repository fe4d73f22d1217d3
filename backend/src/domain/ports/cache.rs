//! Port for the key/value store backing cache-aside reads.
//!
//! Values are opaque to the store; each caller decides what it keeps under
//! its own keys. Entries expire after a TTL fixed by the implementation.

use super::CacheKey;

/// Key/value store with per-entry expiry.
///
/// Implementations must tolerate concurrent `get`/`set` from many request
/// flows and must not block on I/O.
pub trait Cache<V>: Send + Sync {
    /// Return a clone of the live value stored under `key`.
    ///
    /// Absent and expired entries both report `None`.
    fn get(&self, key: &CacheKey) -> Option<V>;

    /// Store `value` under `key`, replacing any previous entry and restarting
    /// its TTL.
    fn set(&self, key: CacheKey, value: V);
}

/// Cache used when caching is disabled: every lookup misses and writes are
/// discarded.
///
/// # Examples
/// ```
/// use gateway::domain::ports::{Cache, CacheKey, NoOpCache};
///
/// let cache = NoOpCache;
/// let key = CacheKey::new("user-1");
/// cache.set(key.clone(), 1_u32);
/// assert_eq!(Cache::<u32>::get(&cache, &key), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

impl<V> Cache<V> for NoOpCache {
    fn get(&self, _key: &CacheKey) -> Option<V> {
        None
    }

    fn set(&self, _key: CacheKey, _value: V) {}
}
