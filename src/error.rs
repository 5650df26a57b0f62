//! Error types for cache construction
//!
//! Cache operations themselves are total: a missing or expired key is reported
//! as `None`, never as an error. The only fallible step is building a cache from
//! a configuration.

use thiserror::Error;

/// Main error type for the cache
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Configuration error - rejected by `CacheConfig::validate`
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CacheError::InvalidConfig("sweep_interval must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: sweep_interval must be greater than 0"
        );

        let error = CacheError::Other("boom".to_string());
        assert_eq!(error.to_string(), "Error: boom");
    }

    #[test]
    fn test_error_equality() {
        let error = CacheError::InvalidConfig("bad".to_string());
        assert_eq!(error.clone(), error);
        assert_ne!(error, CacheError::Other("bad".to_string()));
    }
}
