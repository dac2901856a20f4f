//! Library layer for PriceHunter: cleaning of scraped marketplace listings.
//!
//! Turns raw listing rows (free-text prices in mixed locales, shipping
//! notes, mis-encoded country names) into canonical records with CHF
//! totals, and wraps the `fxrates_api` client with a disk-cached rate
//! service.

pub mod amount;
pub mod cache;
pub mod condition;
pub mod config;
pub mod convert;
pub mod country;
pub mod currency;
pub mod dedupe;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod product;
pub mod rates;
pub mod record;
pub mod schema;
pub mod text;

pub use fxrates_api;

pub use amount::{parse_amount, parse_amount_opt, ParsedAmount};
pub use cache::{CachedRates, RateCache, RateCacheError};
pub use condition::{normalize_condition, Condition};
pub use config::{
    AppConfig, ConfigError, MissingPricePolicy, OutputLayout, PipelineConfig, RateSettings,
    RowPolicy,
};
pub use convert::{convert_total, RateTable};
pub use country::{CountryAliasError, CountryNormalizer};
pub use currency::{detect_currency, Currency};
pub use dedupe::{dedupe, DedupStrategy};
pub use error::PriceHunterError;
pub use extract::{ExtractedFields, FieldExtractor};
pub use pipeline::{BatchStats, Pipeline, PipelineOutput};
pub use product::NOT_AVAILABLE;
pub use rates::{RateService, RateSnapshot, RateSource};
pub use record::{CanonicalRecord, RawRecord};
pub use schema::{ColumnMap, RawTable, RequiredColumns, SchemaError};
pub use text::normalize_text;
