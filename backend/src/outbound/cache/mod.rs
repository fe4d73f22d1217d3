//! In-memory TTL cache adapter.
//!
//! Implements the `Cache` port with a `RwLock`-guarded map. Every entry
//! records its expiry at insertion; reads compare against the injected clock
//! so an expired entry misses even before the sweeper reclaims it.
//!
//! The optional sweeper is a tokio task that periodically drops expired
//! entries to bound memory. It holds only a weak reference and exits once the
//! cache is dropped.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::ports::{Cache, CacheKey};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Thread-safe key/value cache with a fixed TTL per entry.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use gateway::domain::ports::{Cache, CacheKey};
/// use gateway::outbound::cache::InMemoryCache;
///
/// let cache = InMemoryCache::new(Duration::from_secs(300));
/// let key = CacheKey::new("user-1");
/// cache.set(key.clone(), "Bob".to_owned());
/// assert_eq!(cache.get(&key).as_deref(), Some("Bob"));
/// ```
pub struct InMemoryCache<V> {
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<V> InMemoryCache<V> {
    /// Create a cache whose entries live for `ttl`, using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(DefaultClock))
    }

    /// Create a cache reading time from `clock`.
    ///
    /// A TTL too large for the clock's range saturates at the maximum.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the cache holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Drop every entry whose TTL has elapsed and return how many went.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.utc();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> InMemoryCache<V>
where
    V: Send + Sync + 'static,
{
    /// Spawn a task purging expired entries every `interval`.
    ///
    /// Must be called inside a tokio runtime. The task ends on its own once
    /// the last strong reference to the cache is gone.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        let period = interval.max(MIN_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    debug!("cache dropped; stopping sweeper");
                    break;
                };
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!(purged, "swept expired cache entries");
                }
            }
        })
    }
}

impl<V> Cache<V> for InMemoryCache<V>
where
    V: Clone + Send + Sync,
{
    fn get(&self, key: &CacheKey) -> Option<V> {
        let now = self.clock.utc();
        let entries = self.read();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                debug!(%key, "cache entry expired");
                None
            }
            None => None,
        }
    }

    fn set(&self, key: CacheKey, value: V) {
        let expires_at = self.expiry_from(self.clock.utc());
        self.write().insert(key, CacheEntry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    //! TTL semantics driven by a hand-advanced clock.
    use std::sync::Mutex;
    use std::thread;

    use super::*;
    use chrono::Local;
    use rstest::{fixture, rstest};

    const TTL: Duration = Duration::from_secs(300);

    struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        fn advance(&self, delta: Duration) {
            let delta = match TimeDelta::from_std(delta) {
                Ok(delta) => delta,
                Err(error) => panic!("duration out of range: {error}"),
            };
            *self.lock_clock() += delta;
        }

        fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<chrono::Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(Utc::now()))
    }

    fn key(raw: &str) -> CacheKey {
        CacheKey::new(raw)
    }

    fn cache_with(clock: &Arc<MutableClock>) -> InMemoryCache<String> {
        InMemoryCache::with_clock(TTL, clock.clone())
    }

    #[rstest]
    fn set_then_get_returns_the_value(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        cache.set(key("user-1"), "Bob".to_owned());
        assert_eq!(cache.get(&key("user-1")), Some("Bob".to_owned()));
    }

    #[rstest]
    fn unset_key_misses(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        assert_eq!(cache.get(&key("user-404")), None);
    }

    #[rstest]
    fn entry_misses_once_ttl_elapses(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        cache.set(key("user-1"), "Bob".to_owned());

        clock.advance(TTL - Duration::from_secs(1));
        assert!(cache.get(&key("user-1")).is_some(), "entry still live");

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&key("user-1")), None, "expired at exactly the TTL");
        assert_eq!(cache.len(), 1, "expiry does not depend on the sweeper");
    }

    #[rstest]
    fn set_overwrites_and_restarts_ttl(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        cache.set(key("user-1"), "Bob".to_owned());
        clock.advance(Duration::from_secs(200));
        cache.set(key("user-1"), "Robert".to_owned());
        clock.advance(Duration::from_secs(200));

        assert_eq!(cache.get(&key("user-1")), Some("Robert".to_owned()));
    }

    #[rstest]
    fn purge_expired_reclaims_only_dead_entries(clock: Arc<MutableClock>) {
        let cache = cache_with(&clock);
        cache.set(key("user-1"), "old".to_owned());
        clock.advance(Duration::from_secs(250));
        cache.set(key("user-2"), "new".to_owned());
        clock.advance(Duration::from_secs(100));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("user-2")), Some("new".to_owned()));
    }

    #[rstest]
    fn concurrent_readers_and_writers_do_not_interfere(clock: Arc<MutableClock>) {
        let cache = Arc::new(cache_with(&clock));
        cache.set(key("stable"), "kept".to_owned());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for round in 0..200 {
                        cache.set(key(&format!("w{worker}-{round}")), format!("{round}"));
                        assert_eq!(cache.get(&key("stable")), Some("kept".to_owned()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker thread");
        }

        assert_eq!(cache.len(), 1 + 8 * 200);
    }

    #[rstest]
    #[tokio::test]
    async fn sweeper_reclaims_expired_entries(clock: Arc<MutableClock>) {
        let cache = Arc::new(cache_with(&clock));
        cache.set(key("user-1"), "Bob".to_owned());
        clock.advance(TTL);

        let sweeper = cache.spawn_sweeper(Duration::from_millis(5));
        for _ in 0..100 {
            if cache.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert!(cache.is_empty(), "sweeper should purge the expired entry");
        sweeper.abort();
    }

    #[rstest]
    #[tokio::test]
    async fn sweeper_stops_when_cache_is_dropped(clock: Arc<MutableClock>) {
        let cache = Arc::new(cache_with(&clock));
        let sweeper = cache.spawn_sweeper(Duration::from_millis(1));
        drop(cache);

        tokio::time::timeout(Duration::from_secs(5), sweeper)
            .await
            .expect("sweeper exits")
            .expect("sweeper does not panic");
    }
}
