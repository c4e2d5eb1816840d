//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries
//! - Limiter sweep: prunes rate-limit history and drops idle keys

mod sweep;

pub use sweep::{spawn_sweep_task, Sweep, SweepHandle};
