//! API Shield - in-process ephemeral state for HTTP APIs
//!
//! Provides an expiring key-value cache and a sliding-window rate limiter
//! keyed by client and by resource, each with a cancellable background sweep.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::ExpiringCache;
pub use config::Config;
pub use limiter::{PathConfig, SlidingWindowLimiter};
pub use tasks::{spawn_sweep_task, SweepHandle};
