//! Core type definitions for the cache system

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache key type
pub type CacheKey = String;

/// Snapshot of cache performance counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CacheStats {
    /// Total number of reads that returned a value
    pub hits: u64,

    /// Total number of reads that returned nothing (absent or expired)
    pub misses: u64,

    /// Number of entries currently stored, including expired ones not yet reclaimed
    pub entries: usize,

    /// Expired entries dropped on access (`get` or `remove`)
    pub expired_on_read: u64,

    /// Expired entries dropped by a sweep
    pub expired_on_sweep: u64,

    /// Number of sweeps run, manual or background
    pub sweeps: u64,

    /// Entries removed by `clear`, plus live entries removed by `delete` or `remove`
    pub deletions: u64,
}

impl CacheStats {
    /// Calculate cache hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }

    /// Calculate miss rate as a percentage
    pub fn miss_rate(&self) -> f64 {
        100.0 - self.hit_rate()
    }

    /// Calculate total expirations
    pub fn total_expirations(&self) -> u64 {
        self.expired_on_read + self.expired_on_sweep
    }

    /// Entries removed for any reason
    pub fn total_removals(&self) -> u64 {
        self.total_expirations() + self.deletions
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CacheStats {{ hits: {}, misses: {}, hit_rate: {:.2}%, entries: {}, expirations: {}, sweeps: {} }}",
            self.hits,
            self.misses,
            self.hit_rate(),
            self.entries,
            self.total_expirations(),
            self.sweeps
        )
    }
}

/// Lock-free counters behind [`CacheStats`]
///
/// Readers record hits while holding only the shared lock, so every counter is
/// an atomic. A disabled recorder ignores every update.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    expired_on_read: AtomicU64,
    expired_on_sweep: AtomicU64,
    sweeps: AtomicU64,
    deletions: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    pub(crate) fn record_hit(&self) {
        if !self.enabled {
            return;
        }
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        if !self.enabled {
            return;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired_on_read(&self) {
        if !self.enabled {
            return;
        }
        self.expired_on_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sweep(&self, removed: usize) {
        if !self.enabled {
            return;
        }
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.expired_on_sweep
            .fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_deletions(&self, count: usize) {
        if !self.enabled {
            return;
        }
        self.deletions.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
            expired_on_read: self.expired_on_read.load(Ordering::Relaxed),
            expired_on_sweep: self.expired_on_sweep.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            deletions: self.deletions.load(Ordering::Relaxed),
        }
    }
}
