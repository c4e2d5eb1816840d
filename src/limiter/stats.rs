//! Limiter Statistics Module

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::limiter::Axis;

// == Limiter Stats ==
/// Point-in-time snapshot of limiter decisions and table sizes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LimiterStats {
    pub client_admitted: u64,
    pub client_denied: u64,
    pub resource_admitted: u64,
    pub resource_denied: u64,
    /// Keys dropped by the background sweep
    pub swept_keys: u64,
    /// Client keys currently tracked
    pub tracked_clients: usize,
    /// Resource keys currently tracked
    pub tracked_resources: usize,
    /// Registered per-resource overrides
    pub path_overrides: usize,
}

#[derive(Debug, Default)]
pub(crate) struct LimiterCounters {
    client_admitted: AtomicU64,
    client_denied: AtomicU64,
    resource_admitted: AtomicU64,
    resource_denied: AtomicU64,
    swept_keys: AtomicU64,
}

impl LimiterCounters {
    pub fn record(&self, axis: Axis, admitted: bool) {
        let counter = match (axis, admitted) {
            (Axis::Client, true) => &self.client_admitted,
            (Axis::Client, false) => &self.client_denied,
            (Axis::Resource, true) => &self.resource_admitted,
            (Axis::Resource, false) => &self.resource_denied,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_swept(&self, count: usize) {
        self.swept_keys.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(
        &self,
        tracked_clients: usize,
        tracked_resources: usize,
        path_overrides: usize,
    ) -> LimiterStats {
        LimiterStats {
            client_admitted: self.client_admitted.load(Ordering::Relaxed),
            client_denied: self.client_denied.load(Ordering::Relaxed),
            resource_admitted: self.resource_admitted.load(Ordering::Relaxed),
            resource_denied: self.resource_denied.load(Ordering::Relaxed),
            swept_keys: self.swept_keys.load(Ordering::Relaxed),
            tracked_clients,
            tracked_resources,
            path_overrides,
        }
    }
}
