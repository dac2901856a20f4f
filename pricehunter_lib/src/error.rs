//! Error types for the library layer.

use std::fmt;

use crate::cache::RateCacheError;
use crate::config::ConfigError;
use crate::country::CountryAliasError;
use crate::schema::SchemaError;

/// Errors produced by the library layer, wrapping the exchange-rate client
/// and adding validation, configuration and cache failures.
#[derive(Debug)]
pub enum PriceHunterError {
    /// An error from the exchange-rate client.
    Api(fxrates_api::Error),
    /// The input table failed batch validation.
    Schema(SchemaError),
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
    /// The embedded country alias table is malformed.
    CountryAliases(CountryAliasError),
    /// The rate cache could not be read or written.
    Cache(RateCacheError),
}

impl fmt::Display for PriceHunterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "Exchange rate API error: {}", e),
            Self::Schema(e) => write!(f, "Invalid input: {}", e),
            Self::Config(e) => write!(f, "{}", e),
            Self::CountryAliases(e) => write!(f, "Country alias table error: {}", e),
            Self::Cache(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PriceHunterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Schema(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::CountryAliases(e) => Some(e),
            Self::Cache(e) => Some(e),
        }
    }
}

impl From<fxrates_api::Error> for PriceHunterError {
    fn from(e: fxrates_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<SchemaError> for PriceHunterError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<ConfigError> for PriceHunterError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CountryAliasError> for PriceHunterError {
    fn from(e: CountryAliasError) -> Self {
        Self::CountryAliases(e)
    }
}

impl From<RateCacheError> for PriceHunterError {
    fn from(e: RateCacheError) -> Self {
        Self::Cache(e)
    }
}
