//! Configuration for the cache system

use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interval between two reclaimer sweeps when none is configured
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for a [`TtlCache`](crate::cache::TtlCache)
///
/// A `default_ttl` of zero means entries written without an explicit TTL
/// never expire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live applied when `set` is called without an explicit TTL
    pub default_ttl: Duration,

    /// Interval between background sweeps of expired entries
    pub sweep_interval: Duration,

    /// Start the background reclaimer at construction
    /// When false, expired entries are only dropped lazily or by `purge_expired`
    pub enable_reclaimer: bool,

    /// Enable statistics collection
    pub enable_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            // 5 minutes
            default_ttl: Duration::from_secs(300),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            enable_reclaimer: true,
            enable_metrics: true,
        }
    }
}

impl CacheConfig {
    /// Create a new builder for cache configuration
    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    /// Configuration with the given default TTL and every other field at its default
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep_interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for cache configuration
#[derive(Debug, Default)]
pub struct CacheConfigBuilder {
    default_ttl: Option<Duration>,
    sweep_interval: Option<Duration>,
    enable_reclaimer: Option<bool>,
    enable_metrics: Option<bool>,
}

impl CacheConfigBuilder {
    /// Set default TTL for cache entries (zero = never expire)
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Set the interval between reclaimer sweeps
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Enable or disable the background reclaimer
    pub fn enable_reclaimer(mut self, enable: bool) -> Self {
        self.enable_reclaimer = Some(enable);
        self
    }

    /// Enable or disable metrics collection
    pub fn enable_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = Some(enable);
        self
    }

    /// Build the cache configuration
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();

        CacheConfig {
            default_ttl: self.default_ttl.unwrap_or(defaults.default_ttl),
            sweep_interval: self.sweep_interval.unwrap_or(defaults.sweep_interval),
            enable_reclaimer: self.enable_reclaimer.unwrap_or(defaults.enable_reclaimer),
            enable_metrics: self.enable_metrics.unwrap_or(defaults.enable_metrics),
        }
    }
}

/// Preset configurations for common use cases
impl CacheConfig {
    /// Memoization of rapidly changing data
    pub fn short_lived() -> Self {
        Self {
            default_ttl: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Session state: 30 minute lifetime, swept once a minute
    pub fn session() -> Self {
        Self {
            default_ttl: Duration::from_secs(1800),
            sweep_interval: Duration::from_secs(60),
            ..Default::default()
        }
    }

    /// Entries never expire unless given an explicit TTL
    pub fn long_lived() -> Self {
        Self {
            default_ttl: Duration::ZERO,
            sweep_interval: Duration::from_secs(300),
            ..Default::default()
        }
    }
}
