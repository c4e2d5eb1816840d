//! Window policies and the per-resource override registry.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::{RwLock, RwLockReadGuard};

// == Path Config ==
/// Admission threshold and trailing window for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathConfig {
    /// Maximum admitted events inside the window
    pub max_events: usize,
    /// Trailing window length
    pub window: Duration,
}

impl PathConfig {
    pub fn new(max_events: usize, window: Duration) -> Self {
        Self { max_events, window }
    }
}

// == Path Registry ==
/// Resource key -> [`PathConfig`] overrides, falling back to a default.
#[derive(Debug)]
pub struct PathRegistry {
    overrides: RwLock<HashMap<String, PathConfig>>,
    default: PathConfig,
}

impl PathRegistry {
    pub fn new(default: PathConfig) -> Self {
        Self {
            overrides: RwLock::new(HashMap::new()),
            default,
        }
    }

    /// The process-wide fallback policy.
    pub fn default_config(&self) -> PathConfig {
        self.default
    }

    /// Registers or replaces the override for `key`.
    pub fn set(&self, key: impl Into<String>, config: PathConfig) {
        self.overrides.write().insert(key.into(), config);
    }

    /// Resolves the policy for `key`.
    pub fn resolve(&self, key: &str) -> PathConfig {
        self.read().resolve(key)
    }

    /// Number of registered overrides.
    pub fn len(&self) -> usize {
        self.overrides.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.read().is_empty()
    }

    /// Holds the registry open for many lookups under one read lock.
    pub fn read(&self) -> RegistryView<'_> {
        RegistryView {
            overrides: self.overrides.read(),
            default: self.default,
        }
    }
}

/// Read-locked view of a [`PathRegistry`].
pub struct RegistryView<'a> {
    overrides: RwLockReadGuard<'a, HashMap<String, PathConfig>>,
    default: PathConfig,
}

impl RegistryView<'_> {
    pub fn resolve(&self, key: &str) -> PathConfig {
        self.overrides.get(key).copied().unwrap_or(self.default)
    }
}
