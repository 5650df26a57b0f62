//! # ttl-cache
//!
//! An in-process key/value cache with per-entry expiration and automatic
//! reclamation of expired entries.
//!
//! ## Features
//!
//! - Synchronous, thread-safe `set` / `get` / `delete`
//! - Generic over the stored value type
//! - Per-entry TTL overriding a cache-wide default (zero = never expire)
//! - Lazy expiry on read plus a periodic background sweep
//! - Background sweep tied to the cache's lifetime
//!
//! ## Expiry
//!
//! An entry written with a TTL is visible until its TTL has fully elapsed.
//! After that no read returns it, whether or not the reclaimer has run yet.
//!
//! ```rust
//! use ttl_cache::TtlCache;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = TtlCache::new(Duration::from_secs(5));
//!
//!     cache.set_with_ttl("marco", "polo", Duration::ZERO);
//!     cache.set_with_ttl("foo", "bar", Duration::from_millis(10));
//!
//!     tokio::time::sleep(Duration::from_millis(20)).await;
//!
//!     assert_eq!(cache.get("foo"), None);
//!     assert_eq!(cache.get("marco"), Some("polo"));
//! }
//! ```
//!
//! ## Configuration
//!
//! The sweep interval and metrics collection are set through [`CacheConfig`]:
//!
//! ```rust
//! use ttl_cache::{CacheConfig, TtlCache};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CacheConfig::builder()
//!         .default_ttl(Duration::from_secs(60))
//!         .sweep_interval(Duration::from_secs(1))
//!         .build();
//!
//!     let cache: TtlCache<Vec<u8>> = TtlCache::with_config(config)?;
//!     cache.set("blob", vec![1, 2, 3]);
//!     println!("{}", cache.stats());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;

// Re-export main types for convenience
pub use cache::{
    CacheConfig, CacheConfigBuilder, CacheEntry, CacheKey, CacheStats, EntryState, Expiration,
    Remaining, RemovalReason, SweepReport, TtlCache, DEFAULT_SWEEP_INTERVAL,
};
pub use error::{CacheError, Result};
