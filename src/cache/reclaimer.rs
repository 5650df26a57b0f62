//! Background task that sweeps expired entries
//!
//! The task only holds a weak reference to the cache, so it never keeps the
//! entries alive. It exits when the cache is closed, when the last cache handle
//! is dropped (the shutdown sender goes with it), or when its runtime shuts
//! down.
//!
//! Only a multi-threaded runtime is trusted to keep driving the task. A
//! current-thread runtime makes progress only while someone blocks on it, so
//! a cache built inside one gets its own thread instead.

use crate::cache::store::CacheShared;
use crate::error::{CacheError, Result};
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;
use tokio::runtime::{Builder, Handle, RuntimeFlavor};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Name of the thread used when no multi-threaded Tokio runtime is available
pub const RECLAIMER_THREAD_NAME: &str = "ttl-cache-reclaimer";

/// Start the reclaimer for `cache`
///
/// Runs on the current Tokio runtime if it is multi-threaded, otherwise on a
/// dedicated thread driving its own single-threaded runtime.
pub(crate) fn start<V>(cache: &Arc<CacheShared<V>>) -> Result<()>
where
    V: Send + Sync + 'static,
{
    let interval = cache.config.sweep_interval;
    let weak = Arc::downgrade(cache);
    let shutdown_rx = cache.shutdown_tx.subscribe();

    if let Ok(handle) = Handle::try_current() {
        if handle.runtime_flavor() == RuntimeFlavor::MultiThread {
            handle.spawn(run(weak, interval, shutdown_rx));
            return Ok(());
        }
    }

    debug!("Starting reclaimer on dedicated thread {}", RECLAIMER_THREAD_NAME);
    thread::Builder::new()
        .name(RECLAIMER_THREAD_NAME.to_string())
        .spawn(move || {
            let runtime = match Builder::new_current_thread().enable_time().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    warn!("Failed to build reclaimer runtime: {}", e);
                    return;
                }
            };
            runtime.block_on(run(weak, interval, shutdown_rx));
        })
        .map_err(|e| CacheError::Other(format!("failed to spawn reclaimer thread: {}", e)))?;

    Ok(())
}

/// Sweep loop: one pass per `interval`, the first one interval after start
async fn run<V>(cache: Weak<CacheShared<V>>, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
    info!("Starting cache reclaimer (interval: {:?})", interval);

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(cache) = cache.upgrade() else {
                    break;
                };

                let report = cache.purge_expired();
                if !report.is_empty() {
                    debug!("Reclaimer swept {} expired entries", report.removed());
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Cache reclaimer stopped");
}
