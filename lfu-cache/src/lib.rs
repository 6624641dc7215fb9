pub mod cache;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use cache::{
    CacheStats, CacheStrategy, Entry, FrequencyCache, LfuCache, OrderedLfuCache, RecencyCache,
    SharedCache, build_cache,
};
pub use config::{CacheConfig, CacheSection, LogFormat, LoggingConfig};
pub use error::{CacheError, Result};
