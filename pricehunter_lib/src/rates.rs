//! Exchange-rate provider: disk cache, live fetch, hardcoded fallback.

use std::fmt;

use chrono::Utc;
use serde::Serialize;

use crate::cache::{CachedRates, RateCache};
use crate::config::RateSettings;
use crate::convert::RateTable;
use crate::currency::Currency;
use crate::error::PriceHunterError;

/// Where a rate table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Cache,
    Live,
    Defaults,
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateSource::Cache => write!(f, "cache"),
            RateSource::Live => write!(f, "live"),
            RateSource::Defaults => write!(f, "defaults"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    pub source: RateSource,
    pub rates: RateTable,
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Turns "units per CHF" quotes into the divisors used by the converter.
///
/// Currencies missing from the response are left out.
pub fn invert_rates(latest: &fxrates_api::LatestRates) -> RateTable {
    RateTable::from_rates(
        Currency::ALL
            .iter()
            .filter(|c| **c != Currency::Chf)
            .filter_map(|c| {
                latest
                    .rate(c.code())
                    .filter(|r| r.is_finite() && *r > 0.0)
                    .map(|r| (*c, round4(1.0 / r)))
            }),
    )
}

/// Supplies rate tables, preferring a fresh cache over the network and the
/// network over the hardcoded defaults.
pub struct RateService {
    client: fxrates_api::Client,
    cache: RateCache,
}

impl RateService {
    pub fn new(client: fxrates_api::Client, cache: RateCache) -> Self {
        Self { client, cache }
    }

    pub fn from_settings(settings: &RateSettings) -> Self {
        let client = fxrates_api::Client::with_base_url(&settings.api_url)
            .with_timeout(settings.timeout());
        let cache = RateCache::new(&settings.cache_path, settings.cache_ttl());
        Self::new(client, cache)
    }

    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// The cache file's contents regardless of age.
    pub fn cached(&self) -> Result<Option<CachedRates>, PriceHunterError> {
        Ok(self.cache.read()?)
    }

    /// Rates for `currencies`. Never fails: any fetch or cache problem is
    /// logged and answered with the defaults.
    pub async fn get_rates(&self, currencies: &[Currency]) -> RateTable {
        self.snapshot(currencies).await.rates
    }

    /// Like [`RateService::get_rates`], also reporting where the table came
    /// from.
    pub async fn snapshot(&self, currencies: &[Currency]) -> RateSnapshot {
        if let Some(rates) = self.cache.load_fresh(Utc::now()) {
            if rates.covers(currencies) {
                tracing::info!("using cached rates from {}", self.cache.path().display());
                return RateSnapshot {
                    source: RateSource::Cache,
                    rates,
                };
            }
        }

        match self.refresh().await {
            Ok(rates) => RateSnapshot {
                source: RateSource::Live,
                rates,
            },
            Err(e) => {
                tracing::warn!("exchange rate fetch failed, using default rates: {}", e);
                RateSnapshot {
                    source: RateSource::Defaults,
                    rates: RateTable::defaults(),
                }
            }
        }
    }

    /// Fetches CHF-based rates and writes them to the cache. Currencies the
    /// API leaves out are filled from the defaults before storing, so the
    /// cached table always covers every supported currency.
    ///
    /// A failed cache write is logged, not returned.
    pub async fn refresh(&self) -> Result<RateTable, PriceHunterError> {
        let latest = self.client.latest(Currency::Chf.code()).await?;
        let rates = fill_from_defaults(invert_rates(&latest), &Currency::ALL);
        if let Err(e) = self.cache.store(&rates, Utc::now()) {
            tracing::warn!(
                "could not write rate cache {}: {}",
                self.cache.path().display(),
                e
            );
        }
        tracing::info!("fetched {} exchange rates from {}", rates.len(), self.client.base_url());
        Ok(rates)
    }
}

fn fill_from_defaults(mut rates: RateTable, currencies: &[Currency]) -> RateTable {
    let defaults = RateTable::defaults();
    for currency in currencies {
        if rates.get(*currency).is_none() {
            if let Some(rate) = defaults.get(*currency) {
                tracing::warn!("no live rate for {}, using default {}", currency, rate);
                rates.insert(*currency, rate);
            }
        }
    }
    rates
}
