//! Sliding-Window Limiter Module
//!
//! Admission decisions along two independent axes: the client making a
//! request and the resource it targets.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::limiter::stats::LimiterCounters;
use crate::limiter::{LimiterStats, PathConfig, PathRegistry, RateKeyRecord};

// == Axis ==
/// Which table an admission check runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Keyed by client identity, always governed by the default policy
    Client,
    /// Keyed by resource, governed by the override registry
    Resource,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Client => f.write_str("client"),
            Axis::Resource => f.write_str("resource"),
        }
    }
}

type Table = Mutex<HashMap<String, RateKeyRecord>>;

// == Sliding Window Limiter ==
/// Thread-safe sliding-window limiter with per-resource overrides.
///
/// Each table has its own lock, so client checks never wait on resource
/// checks and vice versa. The prune-compare-append step for a key runs
/// entirely under its table's lock.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    clients: Table,
    resources: Table,
    registry: PathRegistry,
    counters: LimiterCounters,
}

impl SlidingWindowLimiter {
    // == Constructor ==
    /// Creates a limiter whose default policy admits `max_events` per `window`.
    pub fn new(max_events: usize, window: Duration) -> Self {
        Self::with_default(PathConfig::new(max_events, window))
    }

    pub fn with_default(default: PathConfig) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            resources: Mutex::new(HashMap::new()),
            registry: PathRegistry::new(default),
            counters: LimiterCounters::default(),
        }
    }

    /// The process-wide default policy.
    pub fn default_config(&self) -> PathConfig {
        self.registry.default_config()
    }

    // == Set Path Config ==
    /// Registers or replaces the policy for one resource key.
    ///
    /// History already recorded for the key is kept; the new policy applies
    /// from the next check or sweep onward.
    pub fn set_path_config(
        &self,
        resource: impl Into<String>,
        max_events: usize,
        window: Duration,
    ) {
        let resource = resource.into();
        debug!(resource = %resource, max_events, ?window, "Registered path rate limit");
        self.registry.set(resource, PathConfig::new(max_events, window));
    }

    /// Policy currently governing `resource`.
    pub fn path_config(&self, resource: &str) -> PathConfig {
        self.registry.resolve(resource)
    }

    // == Admission ==
    /// Records one event for `client` if the default policy allows it.
    pub fn is_client_allowed(&self, client: &str) -> bool {
        self.admit(Axis::Client, client, Instant::now)
    }

    /// Records one event for `resource` if its resolved policy allows it.
    pub fn is_resource_allowed(&self, resource: &str) -> bool {
        self.admit(Axis::Resource, resource, Instant::now)
    }

    /// Admission check on `axis` at an explicit instant.
    pub fn is_allowed_at(&self, axis: Axis, key: &str, now: Instant) -> bool {
        self.admit(axis, key, || now)
    }

    fn admit(&self, axis: Axis, key: &str, clock: impl FnOnce() -> Instant) -> bool {
        let policy = match axis {
            Axis::Client => self.registry.default_config(),
            Axis::Resource => self.registry.resolve(key),
        };

        let admitted = {
            let mut table = self.table(axis).lock();
            // Read the clock under the lock so a key's history stays ordered
            let now = clock();
            match table.get_mut(key) {
                Some(record) => record.try_admit(now, policy),
                None => {
                    let mut record = RateKeyRecord::new();
                    let admitted = record.try_admit(now, policy);
                    if !record.is_empty() {
                        table.insert(key.to_owned(), record);
                    }
                    admitted
                }
            }
        };

        self.counters.record(axis, admitted);
        if admitted {
            trace!(%axis, key, "Admitted");
        } else {
            debug!(%axis, key, max_events = policy.max_events, "Rate limit exceeded");
        }
        admitted
    }

    // == Purge Stale ==
    /// Prunes every record and drops keys left with no events.
    ///
    /// Client records use the default window; resource records use the window
    /// currently resolved for their key. Returns the number of keys removed.
    pub fn purge_stale(&self) -> usize {
        self.purge_stale_at(Instant::now())
    }

    pub fn purge_stale_at(&self, now: Instant) -> usize {
        let default_window = self.registry.default_config().window;
        let clients_removed = {
            let mut clients = self.clients.lock();
            retain_active(&mut clients, |_| default_window, now)
        };

        let resources_removed = {
            let registry = self.registry.read();
            let mut resources = self.resources.lock();
            retain_active(&mut resources, |key| registry.resolve(key).window, now)
        };

        let removed = clients_removed + resources_removed;
        self.counters.record_swept(removed);
        removed
    }

    // == Stats ==
    pub fn tracked_keys(&self, axis: Axis) -> usize {
        self.table(axis).lock().len()
    }

    pub fn stats(&self) -> LimiterStats {
        self.counters.snapshot(
            self.tracked_keys(Axis::Client),
            self.tracked_keys(Axis::Resource),
            self.registry.len(),
        )
    }

    fn table(&self, axis: Axis) -> &Table {
        match axis {
            Axis::Client => &self.clients,
            Axis::Resource => &self.resources,
        }
    }
}

fn retain_active(
    table: &mut HashMap<String, RateKeyRecord>,
    window_for: impl Fn(&str) -> Duration,
    now: Instant,
) -> usize {
    let before = table.len();
    table.retain(|key, record| {
        record.prune(now, window_for(key.as_str()));
        !record.is_empty()
    });
    before - table.len()
}
