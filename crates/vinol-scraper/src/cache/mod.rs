//! Time-to-live cache for rating lookups, keyed by search URL.
//!
//! Entries are stored as JSON [`CacheEntry`] values in an injected
//! [`KeyValueStore`]. An entry is fresh while `now - timestamp < ttl`;
//! stale, future-dated, or undecodable entries read as misses. Entries are
//! overwritten on every miss and never deleted.

mod store;

use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

pub use store::{FileStore, KeyValueStore, MemoryStore};

pub const DEFAULT_TTL_HOURS: u64 = 24;
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        age >= TimeDelta::zero() && age < ttl
    }
}

pub struct TtlCache<S> {
    store: S,
    ttl: TimeDelta,
}

impl<S: KeyValueStore> TtlCache<S> {
    #[must_use]
    pub fn new(store: S, ttl: TimeDelta) -> Self {
        Self { store, ttl }
    }

    /// Cache with a TTL given in whole hours.
    #[must_use]
    pub fn with_ttl_hours(store: S, hours: u64) -> Self {
        // Clamped well below TimeDelta's range.
        let hours = i64::try_from(hours.min(MAX_TTL_HOURS)).unwrap_or(0);
        Self::new(store, TimeDelta::hours(hours))
    }

    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the cached value for `key`, or `None` on a miss or expiry.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let raw = self.store.load(key)?;
        let entry = match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring malformed cache entry");
                return None;
            }
        };
        if !entry.is_fresh(now, self.ttl) {
            tracing::debug!(key, stored_at = %entry.timestamp, "cache entry expired");
            return None;
        }
        Some(entry.data)
    }

    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be encoded or written.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        self.set_at(key, value, Utc::now())
    }

    /// # Errors
    ///
    /// Returns [`CacheError`] if the entry cannot be encoded or written.
    pub fn set_at<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let entry = CacheEntry {
            data: value,
            timestamp: now,
        };
        let raw = serde_json::to_string(&entry).map_err(|source| CacheError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.store.save(key, raw)
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// result.
    ///
    /// Every successful fetch is stored, including values that mean "nothing
    /// found", so a negative outcome is not re-fetched before it expires.
    /// Fetch errors are returned as-is and leave the cache untouched. A
    /// failed cache write is logged and does not affect the returned value.
    ///
    /// Concurrent callers racing on the same key may each fetch; the last
    /// write wins.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` returns.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: &str, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get::<T>(key) {
            tracing::debug!(key, "cache hit");
            return Ok(hit);
        }

        let value = fetch(key.to_owned()).await?;
        if let Err(e) = self.set(key, &value) {
            tracing::warn!(key, error = %e, "failed to write cache entry");
        }
        Ok(value)
    }
}

#[cfg(test)]
#[path = "../cache_test.rs"]
mod tests;
