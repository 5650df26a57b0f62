//! Walkthrough of default TTLs, never-expiring entries, and expiry
//!
//! Run with: cargo run --example basic_usage
//! Set RUST_LOG=ttl_cache=debug to see the cache's own logging.

use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ttl_cache::TtlCache;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Default TTL of 5 seconds
    let cache = TtlCache::new(Duration::from_secs(5));

    // Never expires
    cache.set_with_ttl("marco", "polo", Duration::ZERO);
    cache.set_with_ttl("foo", "bar", Duration::from_secs(10));

    tokio::time::sleep(Duration::from_secs(6)).await;

    if let Some(value) = cache.get("foo") {
        println!("Found value: {}", value);
    }

    tokio::time::sleep(Duration::from_secs(6)).await;

    if cache.get("foo").is_none() {
        println!("Item expired and not found");
    }
    if let Some(value) = cache.get("marco") {
        println!("Found value: {}", value);
    }

    println!("{}", serde_json::to_string_pretty(&cache.stats())?);

    cache.close();
    Ok(())
}
