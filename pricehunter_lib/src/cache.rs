//! On-disk cache of the last fetched exchange-rate table.
//!
//! The cache file is a small JSON document:
//! `{"timestamp": "<RFC 3339>", "rates": {"EUR": 0.95, ...}}`.
//! Entries older than the configured TTL are ignored, never deleted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::convert::RateTable;
use crate::currency::Currency;

/// Errors from reading or writing the rate cache file.
#[derive(Error, Debug)]
pub enum RateCacheError {
    #[error("Rate cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Rate cache is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Contents of the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRates {
    pub timestamp: DateTime<Utc>,
    pub rates: BTreeMap<String, f64>,
}

impl CachedRates {
    pub fn from_table(table: &RateTable, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            rates: table
                .iter()
                .map(|(currency, rate)| (currency.code().to_string(), rate))
                .collect(),
        }
    }

    /// Whether the entry is at most `ttl` old at `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now.signed_duration_since(self.timestamp) <= ttl,
            Err(_) => true,
        }
    }

    /// Rates for the known currencies; other codes are skipped.
    pub fn to_table(&self) -> RateTable {
        RateTable::from_rates(
            self.rates
                .iter()
                .filter_map(|(code, rate)| code.parse::<Currency>().ok().map(|c| (c, *rate))),
        )
    }
}

/// File-backed cache with time-to-live expiration.
#[derive(Debug, Clone)]
pub struct RateCache {
    path: PathBuf,
    ttl: Duration,
}

impl RateCache {
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Reads the cache file. A missing file is `Ok(None)`.
    pub fn read(&self) -> Result<Option<CachedRates>, RateCacheError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Returns the cached table if it is fresh at `now`. Unreadable or
    /// corrupt files count as a miss.
    pub fn load_fresh(&self, now: DateTime<Utc>) -> Option<RateTable> {
        let cached = match self.read() {
            Ok(cached) => cached?,
            Err(e) => {
                tracing::warn!("ignoring rate cache {}: {}", self.path.display(), e);
                return None;
            }
        };
        if !cached.is_fresh(now, self.ttl) {
            tracing::debug!("rate cache from {} is stale", cached.timestamp);
            return None;
        }
        Some(cached.to_table())
    }

    /// Writes `table` stamped with `now`.
    pub fn store(&self, table: &RateTable, now: DateTime<Utc>) -> Result<(), RateCacheError> {
        let cached = CachedRates::from_table(table, now);
        let json = serde_json::to_string_pretty(&cached)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
