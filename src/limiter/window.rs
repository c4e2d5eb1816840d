//! Per-key record of recently admitted events.

use std::time::{Duration, Instant};

use crate::limiter::PathConfig;

// == Rate Key Record ==
/// Instants of the events admitted for one key, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RateKeyRecord {
    timestamps: Vec<Instant>,
}

impl RateKeyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every timestamp that has aged out of `window`.
    ///
    /// A timestamp `t` stays only while `now - t < window`; one that is
    /// exactly `window` old is already outside.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        self.timestamps
            .retain(|&t| now.saturating_duration_since(t) < window);
    }

    /// Prunes, then records `now` if fewer than `max_events` remain.
    ///
    /// Returns whether the event was admitted. A denied event leaves only the
    /// pruned history behind.
    pub fn try_admit(&mut self, now: Instant, policy: PathConfig) -> bool {
        self.prune(now, policy.window);

        if self.timestamps.len() >= policy.max_events {
            return false;
        }

        self.timestamps.push(now);
        true
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}
