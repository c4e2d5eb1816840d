//! Rate Limiter Module
//!
//! Sliding-window admission control tracked separately per client and per
//! resource, with per-resource policy overrides.

mod policy;
mod sliding_window;
mod stats;
mod window;

#[cfg(test)]
mod property_tests;

pub use policy::{PathConfig, PathRegistry, RegistryView};
pub use sliding_window::{Axis, SlidingWindowLimiter};
pub use stats::LimiterStats;
pub use window::RateKeyRecord;
