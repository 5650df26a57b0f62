//! Main cache store implementation with TTL expiry and background reclamation

use crate::cache::{
    config::CacheConfig,
    entry::{CacheEntry, Remaining},
    invalidation::{RemovalReason, SweepReport},
    reclaimer,
    types::{CacheKey, CacheStats, StatsRecorder},
};
use crate::error::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// In-memory key/value cache with per-entry expiration
///
/// This implementation provides:
/// - Thread-safe synchronous access via a reader/writer lock
/// - A default TTL with per-write override (zero = never expire)
/// - Lazy expiry: a read that finds an expired entry removes it
/// - A background reclaimer that sweeps expired entries on a fixed interval
///
/// `TtlCache` is a handle; clones share the same entries. The reclaimer stops
/// when [`close`](TtlCache::close) is called or the last handle is dropped.
pub struct TtlCache<V> {
    shared: Arc<CacheShared<V>>,
}

/// State shared between cache handles and the reclaimer
pub(crate) struct CacheShared<V> {
    /// Cache configuration
    pub(crate) config: CacheConfig,

    /// Main storage: key -> entry
    entries: RwLock<HashMap<CacheKey, CacheEntry<V>>>,

    /// Performance counters
    stats: StatsRecorder,

    /// Stop signal for the reclaimer; dropping it also stops the reclaimer
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl<V> CacheShared<V> {
    /// Remove `key` if the entry stored under it is expired
    ///
    /// Expiry is checked under the exclusive lock, so an entry written after
    /// a reader saw the expired one is kept.
    pub(crate) fn remove_if_expired(&self, key: &str) -> bool {
        let mut entries = self.entries.write();
        if !entries.get(key).is_some_and(CacheEntry::is_expired) {
            return false;
        }

        entries.remove(key);
        drop(entries);

        self.stats.record_expired_on_read();
        debug!("Cache entry expired: {}", key);
        true
    }

    /// Remove all expired entries
    pub(crate) fn purge_expired(&self) -> SweepReport {
        let now = Instant::now();
        let mut expired_keys = Vec::new();

        self.entries.write().retain(|key, entry| {
            if entry.is_expired_at(now) {
                expired_keys.push(key.clone());
                false
            } else {
                true
            }
        });

        self.stats.record_sweep(expired_keys.len());
        if !expired_keys.is_empty() {
            debug!("Cleaned up {} expired entries", expired_keys.len());
        }

        SweepReport::new(RemovalReason::Expired, expired_keys)
    }
}

impl<V> TtlCache<V>
where
    V: Send + Sync + 'static,
{
    /// Create a cache with the given default TTL and a 10 second sweep interval
    ///
    /// A zero `default_ttl` means entries set without an explicit TTL never
    /// expire. Never fails: see [`with_config`](TtlCache::with_config) for
    /// where the reclaimer runs.
    pub fn new(default_ttl: Duration) -> Self {
        Self::build(CacheConfig::with_default_ttl(default_ttl))
    }

    /// Create a cache with the given configuration
    ///
    /// Inside a multi-threaded Tokio runtime the reclaimer is spawned on that
    /// runtime. Anywhere else, including a current-thread runtime, it gets a
    /// dedicated thread. If the thread cannot be started the cache still
    /// works, relying on lazy expiry and `purge_expired`.
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CacheConfig) -> Self {
        info!("Initializing TTL cache with config: {:?}", config);

        let (shutdown_tx, _) = watch::channel(false);
        let shared = Arc::new(CacheShared {
            stats: StatsRecorder::new(config.enable_metrics),
            config,
            entries: RwLock::new(HashMap::new()),
            shutdown_tx,
        });

        if shared.config.enable_reclaimer {
            if let Err(e) = reclaimer::start(&shared) {
                warn!(
                    "Background reclaimer unavailable, expired entries are only removed on access: {}",
                    e
                );
            }
        }

        Self { shared }
    }
}

impl<V> TtlCache<V> {
    /// Insert a value using the default TTL
    pub fn set(&self, key: impl Into<CacheKey>, value: V) {
        self.insert(key, value, None);
    }

    /// Insert a value with an explicit TTL (zero = never expire)
    pub fn set_with_ttl(&self, key: impl Into<CacheKey>, value: V, ttl: Duration) {
        self.insert(key, value, Some(ttl));
    }

    /// Insert a value, overwriting any entry for `key`
    ///
    /// TTL precedence: an explicit non-zero TTL expires the entry after that
    /// duration, an explicit zero never expires, and `None` applies the
    /// default TTL under the same rule. Returns the previous value if it was
    /// still live.
    pub fn insert(&self, key: impl Into<CacheKey>, value: V, ttl: Option<Duration>) -> Option<V> {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.shared.config.default_ttl);
        let entry = CacheEntry::new(value, ttl);
        let now = entry.created_at;

        let mut entries = self.shared.entries.write();
        if entries.contains_key(&key) {
            debug!("Updating existing cache entry: {}", key);
        } else {
            debug!("Inserting new cache entry: {}", key);
        }
        let previous = entries.insert(key, entry);
        drop(entries);

        let previous = previous?;
        if previous.is_expired_at(now) {
            None
        } else {
            Some(previous.into_value())
        }
    }

    /// Remove a specific entry from the cache
    ///
    /// Returns the value if the entry was still live. An expired entry found
    /// here counts as an expiration, not a deletion.
    pub fn remove(&self, key: &str) -> Option<V> {
        let entry = self.shared.entries.write().remove(key)?;

        if entry.is_expired() {
            self.shared.stats.record_expired_on_read();
            debug!("Cache entry expired: {}", key);
            return None;
        }

        self.shared.stats.record_deletions(1);
        debug!("Removed cache entry: {}", key);
        Some(entry.into_value())
    }

    /// Remove `key` if present
    pub fn delete(&self, key: &str) {
        self.remove(key);
    }

    /// Check if a live entry exists (no stats, no lazy removal)
    pub fn contains_key(&self, key: &str) -> bool {
        self.shared
            .entries
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remaining lifetime of a live entry
    pub fn time_to_live(&self, key: &str) -> Option<Remaining> {
        self.shared.entries.read().get(key)?.time_to_live()
    }

    /// Remove all expired entries now, without waiting for the reclaimer
    pub fn purge_expired(&self) -> SweepReport {
        self.shared.purge_expired()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) -> SweepReport {
        let keys: Vec<CacheKey> = self
            .shared
            .entries
            .write()
            .drain()
            .map(|(key, _)| key)
            .collect();
        self.shared.stats.record_deletions(keys.len());

        info!("Cleared {} entries from cache", keys.len());
        SweepReport::new(RemovalReason::Cleared, keys)
    }

    /// Number of stored entries, including expired ones not yet reclaimed
    pub fn len(&self) -> usize {
        self.shared.entries.read().len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.shared.entries.read().is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot(self.len())
    }

    /// Default TTL applied by [`set`](TtlCache::set)
    pub fn default_ttl(&self) -> Duration {
        self.shared.config.default_ttl
    }

    /// Cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.shared.config
    }

    /// Stop the background reclaimer
    ///
    /// The cache stays usable; expired entries are then only removed on access
    /// or by `purge_expired`. Affects every handle sharing this cache.
    pub fn close(&self) {
        if !self.shared.shutdown_tx.send_replace(true) {
            info!("Closing TTL cache, stopping reclaimer");
        }
    }

    /// Check if [`close`](TtlCache::close) has been called
    pub fn is_closed(&self) -> bool {
        *self.shared.shutdown_tx.borrow()
    }
}

impl<V: Clone> TtlCache<V> {
    /// Get a value from the cache
    ///
    /// An expired entry is reported as absent and removed. The lookup runs
    /// under the shared lock; the removal re-checks expiry under the exclusive
    /// lock so a value written in between is kept.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.shared.entries.read();
            match entries.get(key) {
                None => {
                    debug!("Cache miss: {}", key);
                    self.shared.stats.record_miss();
                    return None;
                }
                Some(entry) if !entry.is_expired() => {
                    self.shared.stats.record_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }

        self.shared.remove_if_expired(key);
        self.shared.stats.record_miss();
        None
    }
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("config", &self.shared.config)
            .field("entries", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual_cache(default_ttl: Duration) -> TtlCache<String> {
        let config = CacheConfig::builder()
            .default_ttl(default_ttl)
            .enable_reclaimer(false)
            .build();
        TtlCache::with_config(config).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_basic_set_and_get() {
        let cache = manual_cache(Duration::from_secs(60));

        cache.set("key1", "value1".to_string());

        assert_eq!(cache.get("key1"), Some("value1".to_string()));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_miss() {
        let cache = manual_cache(Duration::from_secs(60));

        assert_eq!(cache.get("nonexistent"), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_expiry_removes_entry() {
        let cache = manual_cache(Duration::from_millis(100));

        cache.set("key1", "value1".to_string());
        assert!(cache.get("key1").is_some());

        tokio::time::advance(Duration::from_millis(150)).await;

        // Still stored until someone looks at it
        assert_eq!(cache.len(), 1);
        assert!(cache.get("key1").is_none());
        assert_eq!(cache.len(), 0);

        let stats = cache.stats();
        assert_eq!(stats.expired_on_read, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_ttl_overrides_default() {
        let cache = manual_cache(Duration::from_secs(5));

        cache.set_with_ttl("short", "v".to_string(), Duration::from_secs(1));
        cache.set("default", "v".to_string());

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.get("short"), None);
        assert_eq!(cache.get("default"), Some("v".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_expires() {
        let cache = manual_cache(Duration::from_secs(1));

        cache.set_with_ttl("forever", "v".to_string(), Duration::ZERO);
        tokio::time::advance(Duration::from_secs(24 * 3600)).await;

        assert_eq!(cache.get("forever"), Some("v".to_string()));
        assert_eq!(cache.time_to_live("forever"), Some(Remaining::Never));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_default_ttl_never_expires() {
        let cache = manual_cache(Duration::ZERO);

        cache.set("key", "v".to_string());
        tokio::time::advance(Duration::from_secs(3600)).await;

        assert_eq!(cache.get("key"), Some("v".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_returns_live_previous_value() {
        let cache = manual_cache(Duration::from_secs(1));

        assert_eq!(cache.insert("key", "v1".to_string(), None), None);
        assert_eq!(
            cache.insert("key", "v2".to_string(), None),
            Some("v1".to_string())
        );

        tokio::time::advance(Duration::from_secs(2)).await;
        // The expired v2 is replaced but not reported
        assert_eq!(cache.insert("key", "v3".to_string(), None), None);
        assert_eq!(cache.get("key"), Some("v3".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_expiration() {
        let cache = manual_cache(Duration::from_secs(10));

        cache.set("key", "old".to_string());
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("key", "new".to_string());
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("key"), Some("new".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_and_delete() {
        let cache = manual_cache(Duration::from_secs(60));

        cache.set("key1", "value1".to_string());
        cache.set("key2", "value2".to_string());

        assert_eq!(cache.remove("key1"), Some("value1".to_string()));
        assert_eq!(cache.get("key1"), None);

        cache.delete("key2");
        cache.delete("missing");
        assert_eq!(cache.get("key2"), None);
        assert_eq!(cache.stats().deletions, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_expired_entry_returns_none() {
        let cache = manual_cache(Duration::from_secs(1));

        cache.set("key", "value".to_string());
        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(cache.remove("key"), None);
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.deletions, 0);
        assert_eq!(stats.expired_on_read, 1);
        assert_eq!(stats.total_removals(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_removal_keeps_fresh_value() {
        let cache = manual_cache(Duration::from_secs(1));

        cache.set("key", "stale".to_string());
        tokio::time::advance(Duration::from_secs(2)).await;

        // A reader sees the expired entry under the shared lock...
        let seen_expired = cache
            .shared
            .entries
            .read()
            .get("key")
            .is_some_and(CacheEntry::is_expired);
        assert!(seen_expired);

        // ...a writer stores a fresh value before the reader takes the exclusive lock
        cache.set("key", "fresh".to_string());

        assert!(!cache.shared.remove_if_expired("key"));
        assert_eq!(cache.get("key"), Some("fresh".to_string()));
        assert_eq!(cache.stats().expired_on_read, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_if_expired_drops_stale_entry() {
        let cache = manual_cache(Duration::from_secs(1));

        cache.set("key", "stale".to_string());
        assert!(!cache.shared.remove_if_expired("key"));
        assert!(!cache.shared.remove_if_expired("missing"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.shared.remove_if_expired("key"));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().expired_on_read, 1);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_overwrite_is_logged() {
        let cache = manual_cache(Duration::from_secs(60));
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            cache.set("key", "v1".to_string());
            cache.set("key", "v2".to_string());
        });

        let output = String::from_utf8(logs.0.lock().clone()).unwrap();
        assert!(output.contains("Inserting new cache entry: key"));
        assert!(output.contains("Updating existing cache entry: key"));
    }

    #[test]
    fn test_new_uses_default_sweep_interval() {
        let cache: TtlCache<u8> = TtlCache::new(Duration::from_secs(1));
        assert_eq!(cache.config().sweep_interval, crate::cache::DEFAULT_SWEEP_INTERVAL);
        cache.close();
        assert_eq!(
            CacheConfig::with_default_ttl(Duration::from_secs(1)).sweep_interval,
            Duration::from_secs(10)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_contains_key_skips_expired() {
        let cache = manual_cache(Duration::from_secs(1));

        cache.set("key", "value".to_string());
        assert!(cache.contains_key("key"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!cache.contains_key("key"));
        // contains_key never removes
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().misses, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_time_to_live() {
        let cache = manual_cache(Duration::from_secs(10));

        cache.set("key", "value".to_string());
        tokio::time::advance(Duration::from_secs(3)).await;

        assert_eq!(
            cache.time_to_live("key"),
            Some(Remaining::For(Duration::from_secs(7)))
        );
        assert_eq!(cache.time_to_live("missing"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let cache = manual_cache(Duration::from_secs(60));

        cache.set("key1", "value1".to_string());
        cache.set("key2", "value2".to_string());

        let report = cache.clear();
        assert_eq!(report.reason, RemovalReason::Cleared);
        assert_eq!(report.removed(), 2);

        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = manual_cache(Duration::from_millis(50));

        cache.set("key1", "value1".to_string());
        cache.set("key2", "value2".to_string());
        cache.set_with_ttl("keep", "value3".to_string(), Duration::ZERO);

        tokio::time::advance(Duration::from_millis(100)).await;

        let report = cache.purge_expired();
        let mut keys = report.keys.clone();
        keys.sort();
        assert_eq!(report.reason, RemovalReason::Expired);
        assert_eq!(keys, vec!["key1".to_string(), "key2".to_string()]);
        assert_eq!(cache.len(), 1);

        let stats = cache.stats();
        assert_eq!(stats.sweeps, 1);
        assert_eq!(stats.expired_on_sweep, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_disabled() {
        let config = CacheConfig::builder()
            .enable_reclaimer(false)
            .enable_metrics(false)
            .build();
        let cache: TtlCache<u32> = TtlCache::with_config(config).unwrap();

        cache.set("key", 1);
        cache.get("key");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = CacheConfig::builder()
            .sweep_interval(Duration::ZERO)
            .build();

        assert!(TtlCache::<String>::with_config(config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_entries() {
        let cache = manual_cache(Duration::from_secs(60));
        let other = cache.clone();

        other.set("key", "value".to_string());
        assert_eq!(cache.get("key"), Some("value".to_string()));

        cache.close();
        assert!(other.is_closed());
    }
}
