//! Cache Store Module
//!
//! Shared expiring key-value table with lazy expiry on read and a sweep hook
//! for the background cleanup task.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::finite::ensure_finite;
use crate::cache::sanitize::escape_html;
use crate::cache::stats::CacheCounters;
use crate::cache::{CacheEntry, CacheStats};

// == Expiring Cache ==
/// Thread-safe in-memory cache where every entry carries its own expiration.
///
/// All operations take `&self`; share the cache between tasks with an `Arc`.
/// Reads never return an entry whose expiration instant has passed, whether
/// or not the sweep has physically removed it yet.
#[derive(Debug, Default)]
pub struct ExpiringCache {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Performance counters
    counters: CacheCounters,
}

impl ExpiringCache {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores `value` under `key`, expiring `ttl` after this call.
    ///
    /// A zero `ttl` stores the entry without expiration. Any previous entry
    /// for `key` is replaced.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>, ttl: Duration) {
        let entry = CacheEntry::new(value.into(), ttl);
        self.entries.write().insert(key.into(), entry);
    }

    // == Get ==
    /// Retrieves the value stored under `key`.
    ///
    /// Returns `None` if the key was never set, was deleted or flushed, or
    /// has expired.
    pub fn get(&self, key: &str) -> Option<Value> {
        let value = self.lookup(key);
        self.record(value.is_some());
        value
    }

    /// Retrieves the value under `key` decoded as `T`.
    ///
    /// A stored value that does not decode as `T` counts as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let decoded = self.lookup(key).and_then(|value| {
            serde_json::from_value(value)
                .map_err(|e| debug!(key, error = %e, "Cached value has unexpected shape"))
                .ok()
        });
        self.record(decoded.is_some());
        decoded
    }

    // == Delete ==
    /// Removes the entry for `key` if present.
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    // == Flush ==
    /// Removes every entry in one step.
    pub fn flush(&self) {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        debug!(count, "Cache flushed");
    }

    // == Safe Set ==
    /// Stores `value` after a JSON serialize/deserialize round trip.
    ///
    /// Only what survives the round trip is cached. If either step fails the
    /// call does nothing and the table is left unchanged. NaN and infinite
    /// floats count as a failure, since JSON would turn them into `null`.
    pub fn safe_set<T>(&self, key: impl Into<String>, value: &T, ttl: Duration)
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        let laundered = ensure_finite(value)
            .and_then(|()| serde_json::to_string(value))
            .and_then(|json| serde_json::from_str::<Value>(&json));

        match laundered {
            Ok(clean) => self.set(key, clean, ttl),
            Err(e) => warn!(key = %key, error = %e, "Value did not survive round trip, not cached"),
        }
    }

    // == Safe Get String ==
    /// Retrieves a string value with HTML special characters escaped.
    ///
    /// Non-string values are reported as absent. Escaping is applied on every
    /// read, even to content that was already escaped when stored.
    pub fn safe_get_string(&self, key: &str) -> Option<String> {
        let text = match self.lookup(key) {
            Some(Value::String(s)) => Some(escape_html(&s)),
            _ => None,
        };
        self.record(text.is_some());
        text
    }

    // == Purge Expired ==
    /// Physically removes every expired entry.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();
        drop(entries);

        self.counters.record_swept(removed);
        removed
    }

    // == Length ==
    /// Returns the number of physically stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.len())
    }

    /// Looks up a live value, removing the entry if it turns out to be expired.
    fn lookup(&self, key: &str) -> Option<Value> {
        {
            let entries = self.entries.read();
            let entry = entries.get(key)?;
            if !entry.is_expired() {
                return Some(entry.value.clone());
            }
        }

        // A writer may have replaced the entry between the two locks
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                self.counters.record_expired();
                debug!(key, "Removed expired cache entry on read");
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    fn record(&self, hit: bool) {
        if hit {
            self.counters.record_hit();
        } else {
            self.counters.record_miss();
        }
    }
}
