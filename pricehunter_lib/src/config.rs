//! Pipeline and rate-service configuration.
//!
//! Configuration is an explicit value handed to [`crate::Pipeline::new`] and
//! [`crate::RateService::from_settings`]. It can be read from a TOML file
//! with `[pipeline]` and `[rates]` tables; every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::dedupe::DedupStrategy;
use crate::extract::DEFAULT_FREE_SHIPPING_MARKERS;
use crate::product::DEFAULT_PRODUCT_KEYS;
pub use crate::schema::RequiredColumns;

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// What happens to rows that lose information during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowPolicy {
    /// Rows without a product name or parsable price abort the batch.
    Strict,
    /// Such rows get placeholder values.
    #[default]
    Lenient,
}

/// How an unparsable price or shipping cost is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingPricePolicy {
    /// As `0.00`.
    #[default]
    Zero,
    /// As an explicit "not available" value.
    NotAvailable,
}

/// Output column set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLayout {
    /// title, condition, total_price, origin, shipping_cost, link
    #[default]
    Compact,
    /// Adds the local price, currency, price with shipping and product name.
    Extended,
}

fn default_free_shipping_markers() -> Vec<String> {
    DEFAULT_FREE_SHIPPING_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn default_product_keys() -> Vec<String> {
    DEFAULT_PRODUCT_KEYS.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub dedup: DedupStrategy,
    pub row_policy: RowPolicy,
    pub required_columns: RequiredColumns,
    pub missing_price: MissingPricePolicy,
    pub layout: OutputLayout,
    pub free_shipping_markers: Vec<String>,
    pub product_keys: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dedup: DedupStrategy::default(),
            row_policy: RowPolicy::default(),
            required_columns: RequiredColumns::default(),
            missing_price: MissingPricePolicy::default(),
            layout: OutputLayout::default(),
            free_shipping_markers: default_free_shipping_markers(),
            product_keys: default_product_keys(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.product_keys.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "product-keys must name at least one URL query key".to_string(),
            ));
        }
        Ok(())
    }
}

pub const DEFAULT_FX_API_URL: &str = "https://open.er-api.com";
pub const DEFAULT_CACHE_PATH: &str = "fx_cache.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RateSettings {
    pub api_url: String,
    pub cache_path: PathBuf,
    pub cache_ttl_hours: u64,
    pub timeout_secs: u64,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_FX_API_URL.to_string(),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            cache_ttl_hours: 48,
            timeout_secs: 5,
        }
    }
}

impl RateSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours * 3600)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api_url)
            .map_err(|e| ConfigError::Invalid(format!("api-url '{}': {}", self.api_url, e)))?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout-secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub rates: RateSettings,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.pipeline.validate()?;
        config.rates.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
