//! Cache Module
//!
//! Provides an in-memory expiring key-value cache with optional
//! sanitizing writes and reads.

mod entry;
mod finite;
mod sanitize;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use sanitize::escape_html;
pub use stats::CacheStats;
pub use store::ExpiringCache;
