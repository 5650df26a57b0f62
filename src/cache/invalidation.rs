//! Why entries leave the cache, and reports of bulk removals

use crate::cache::types::CacheKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reason an entry was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Entry expired based on TTL
    Expired,

    /// Removed by `clear`
    Cleared,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovalReason::Expired => write!(f, "TTL expired"),
            RemovalReason::Cleared => write!(f, "cache cleared"),
        }
    }
}

/// Outcome of a bulk removal (sweep or clear)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    /// Reason for removal
    pub reason: RemovalReason,

    /// When the removal happened
    pub timestamp: DateTime<Utc>,

    /// Keys that were removed
    pub keys: Vec<CacheKey>,
}

impl SweepReport {
    /// Create a new report
    pub fn new(reason: RemovalReason, keys: Vec<CacheKey>) -> Self {
        Self {
            reason,
            timestamp: Utc::now(),
            keys,
        }
    }

    /// Number of keys removed
    pub fn removed(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing was removed
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
