//! Response models for the HTTP surface
//!
//! DTOs serialized into response bodies.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, MessageResponse, StatsResponse};
