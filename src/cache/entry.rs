//! Cache entry management with TTL support

use std::time::Duration;
use tokio::time::Instant;

/// When an entry stops being visible to readers
///
/// Instants come from `tokio::time`, so a paused test clock drives expiry the
/// same way it drives the reclaimer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Exempt from time-based expiry
    Never,

    /// Expired once the clock is strictly past this instant
    At(Instant),
}

impl Expiration {
    /// Expiration for a TTL measured from `now`
    ///
    /// A zero TTL, or one too large for the clock to represent, never expires.
    pub fn from_ttl(ttl: Duration, now: Instant) -> Self {
        if ttl.is_zero() {
            return Expiration::Never;
        }

        match now.checked_add(ttl) {
            Some(at) => Expiration::At(at),
            None => Expiration::Never,
        }
    }

    /// Check if this expiration has passed at `now`
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self {
            Expiration::Never => false,
            Expiration::At(at) => now > *at,
        }
    }

    /// Lifetime left at `now`, `None` once expired
    pub fn remaining_at(&self, now: Instant) -> Option<Remaining> {
        match self {
            Expiration::Never => Some(Remaining::Never),
            Expiration::At(at) if now > *at => None,
            Expiration::At(at) => Some(Remaining::For(at.duration_since(now))),
        }
    }
}

/// Remaining lifetime of a live entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// The entry never expires
    Never,

    /// The entry expires after this duration
    For(Duration),
}

/// Observable state of a stored entry
///
/// Removed entries are simply absent from the store, so there is no variant
/// for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// No expiration, or expiration still in the future
    Live,

    /// Expiration passed, waiting for a reader or the reclaimer to drop it
    Expired,
}

/// A cached value and its expiration
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached value
    pub value: V,

    /// When the entry expires
    pub expiration: Expiration,

    /// When the entry was written
    pub created_at: Instant,
}

impl<V> CacheEntry<V> {
    /// Create a new entry expiring `ttl` from now (zero = never)
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();

        Self {
            value,
            expiration: Expiration::from_ttl(ttl, now),
            created_at: now,
        }
    }

    /// Create an entry that never expires
    pub fn never_expiring(value: V) -> Self {
        Self {
            value,
            expiration: Expiration::Never,
            created_at: Instant::now(),
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Check if the entry has expired at a given instant
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expiration.is_expired_at(now)
    }

    /// State of the entry at a given instant
    pub fn state_at(&self, now: Instant) -> EntryState {
        if self.is_expired_at(now) {
            EntryState::Expired
        } else {
            EntryState::Live
        }
    }

    /// Get time until expiration, `None` if already expired
    pub fn time_to_live(&self) -> Option<Remaining> {
        self.expiration.remaining_at(Instant::now())
    }

    /// Get the age of the entry
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }

    /// Consume the entry, returning its value
    pub fn into_value(self) -> V {
        self.value
    }
}
