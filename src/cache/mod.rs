//! # TTL Cache
//!
//! A string-keyed, in-process cache where every entry carries an optional
//! expiration time.
//!
//! ## Features
//!
//! - **Default TTL with overrides**: each write may supply its own TTL; a zero TTL never expires
//! - **Lazy expiry**: reads never return expired entries and drop them on sight
//! - **Background reclamation**: a reclaimer sweeps entries nobody reads anymore
//! - **Clean shutdown**: the reclaimer stops on `close()` or when the cache is dropped
//! - **Metrics**: hit/miss and removal counters
//!
//! Entries are only ever removed because they expired or were deleted. There is
//! no capacity bound and no eviction policy.
//!
//! ## Example
//!
//! ```rust
//! use ttl_cache::cache::TtlCache;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let cache = TtlCache::new(Duration::from_secs(5));
//!
//! cache.set("session:42", "alice".to_string());
//! cache.set_with_ttl("motd", "hello".to_string(), Duration::ZERO); // never expires
//!
//! if let Some(user) = cache.get("session:42") {
//!     println!("Cache hit: {}", user);
//! }
//!
//! cache.delete("session:42");
//! assert!(cache.get("session:42").is_none());
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod invalidation;
pub mod reclaimer;
pub mod store;
pub mod types;

pub use config::{CacheConfig, CacheConfigBuilder, DEFAULT_SWEEP_INTERVAL};
pub use entry::{CacheEntry, EntryState, Expiration, Remaining};
pub use invalidation::{RemovalReason, SweepReport};
pub use store::TtlCache;
pub use types::{CacheKey, CacheStats};
