//! The cleaning pipeline: validation, per-row transformation and
//! deduplication of a scraped table.

use serde::Serialize;

use crate::amount::round2;
use crate::condition::normalize_condition;
use crate::config::{MissingPricePolicy, PipelineConfig, RowPolicy};
use crate::convert::{convert_total, RateTable};
use crate::country::CountryNormalizer;
use crate::dedupe::dedupe;
use crate::error::PriceHunterError;
use crate::extract::FieldExtractor;
use crate::product::{product_name_from_url, NOT_AVAILABLE};
use crate::record::{CanonicalRecord, RawRecord};
use crate::schema::{row_error, ColumnMap, RawTable, SchemaError};
use crate::text::normalize_text;

/// Counters reported after a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub input_rows: usize,
    pub output_rows: usize,
    pub duplicates_removed: usize,
    pub unparsable_prices: usize,
    pub missing_product_names: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub records: Vec<CanonicalRecord>,
    pub stats: BatchStats,
}

/// A record after transformation, with the anomalies it absorbed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub record: CanonicalRecord,
    pub unparsable_price: bool,
    pub missing_product_name: bool,
}

pub struct Pipeline {
    config: PipelineConfig,
    extractor: FieldExtractor,
    countries: CountryNormalizer,
}

impl Pipeline {
    /// Builds a pipeline with the embedded country alias table.
    pub fn new(config: PipelineConfig) -> Result<Self, PriceHunterError> {
        config.validate()?;
        Ok(Self::with_countries(config, CountryNormalizer::builtin()?))
    }

    pub fn with_countries(config: PipelineConfig, countries: CountryNormalizer) -> Self {
        let extractor = FieldExtractor::new(&config.free_shipping_markers);
        Self {
            config,
            extractor,
            countries,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolves the table's columns and checks the required ones exist.
    pub fn validate(&self, table: &RawTable) -> Result<ColumnMap, SchemaError> {
        let columns = ColumnMap::resolve(table);
        columns.check(self.config.required_columns)?;
        Ok(columns)
    }

    /// Cleans one record.
    pub fn transform(&self, raw: &RawRecord, rates: &RateTable) -> Transformed {
        let fields = self
            .extractor
            .extract(raw.price.as_deref(), raw.shipping.as_deref());
        let (price, shipping) = match self.config.missing_price {
            MissingPricePolicy::Zero => (Some(fields.price_value()), Some(fields.shipping_value())),
            MissingPricePolicy::NotAvailable => (fields.price, fields.shipping),
        };
        let (price_with_shipping, total_price) = match (price, shipping) {
            (Some(p), Some(s)) => (
                Some(round2(p + s)),
                Some(convert_total(p, s, fields.currency, rates)),
            ),
            _ => (None, None),
        };

        let product_name = raw
            .url
            .as_deref()
            .and_then(|url| product_name_from_url(url, &self.config.product_keys));
        let condition_text = normalize_text(raw.condition.as_deref());

        let record = CanonicalRecord {
            title: normalize_text(raw.title.as_deref()).unwrap_or_default(),
            condition: normalize_condition(condition_text.as_deref()),
            origin: self.countries.normalize(raw.origin.as_deref()),
            price,
            currency: fields.currency,
            shipping_cost: shipping,
            price_with_shipping,
            total_price,
            product_name: product_name
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            link: normalize_text(raw.link.as_deref()).unwrap_or_default(),
        };
        Transformed {
            record,
            unparsable_price: fields.price.is_none(),
            missing_product_name: product_name.is_none(),
        }
    }

    /// Cleans a batch of records that already went through column
    /// resolution.
    pub fn run_records(
        &self,
        records: &[RawRecord],
        rates: &RateTable,
    ) -> Result<PipelineOutput, SchemaError> {
        let mut cleaned = Vec::with_capacity(records.len());
        let mut unparsable = Vec::new();
        let mut unnamed = Vec::new();
        for (row, raw) in records.iter().enumerate() {
            let t = self.transform(raw, rates);
            if t.missing_product_name {
                tracing::debug!("row {}: no product name in {:?}", row + 1, raw.url);
                unnamed.push(row);
            }
            if t.unparsable_price {
                tracing::debug!("row {}: unparsable price {:?}", row + 1, raw.price);
                unparsable.push(row);
            }
            cleaned.push(t.record);
        }

        if self.config.row_policy == RowPolicy::Strict {
            if !unnamed.is_empty() {
                return Err(row_error(&unnamed, |count, rows| {
                    SchemaError::MissingProductName { count, rows }
                }));
            }
            if !unparsable.is_empty() {
                return Err(row_error(&unparsable, |count, rows| {
                    SchemaError::UnparsablePrice { count, rows }
                }));
            }
        }

        let input_rows = cleaned.len();
        let records = dedupe(cleaned, self.config.dedup);
        let stats = BatchStats {
            input_rows,
            output_rows: records.len(),
            duplicates_removed: input_rows - records.len(),
            unparsable_prices: unparsable.len(),
            missing_product_names: unnamed.len(),
        };
        tracing::info!(
            "cleaned {} of {} rows ({} duplicates removed, {} unparsable prices, {} without product name)",
            stats.output_rows,
            stats.input_rows,
            stats.duplicates_removed,
            stats.unparsable_prices,
            stats.missing_product_names
        );
        Ok(PipelineOutput { records, stats })
    }

    /// Validates and cleans a whole table.
    pub fn run(&self, table: &RawTable, rates: &RateTable) -> Result<PipelineOutput, PriceHunterError> {
        let columns = self.validate(table)?;
        let records: Vec<RawRecord> = (0..table.len()).map(|row| columns.record(table, row)).collect();
        Ok(self.run_records(&records, rates)?)
    }
}
