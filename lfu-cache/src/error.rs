use thiserror::Error;

/// Main error type for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Key already present in bucket")]
    DuplicateKey,

    #[error("Bucket is full (capacity {capacity})")]
    BucketFull { capacity: usize },

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown cache strategy: {0}")]
    UnknownStrategy(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CacheError {
    /// True for errors that indicate a logic bug rather than bad input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey | Self::BucketFull { .. } | Self::InvariantViolation(_)
        )
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
