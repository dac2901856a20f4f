use std::io::Write;

use anyhow::{bail, Result};
use pricehunter_lib::{CanonicalRecord, Currency, OutputLayout, RateTable, NOT_AVAILABLE};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            other => bail!(
                "unknown output format '{}'. Valid values: table, json, csv, markdown",
                other
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
struct CompactRow {
    title: String,
    condition: String,
    total_price: String,
    origin: String,
    shipping_cost: String,
    link: String,
}

#[derive(Tabled, Serialize)]
struct ExtendedRow {
    title: String,
    condition: String,
    price: String,
    currency: String,
    origin: String,
    shipping_cost: String,
    price_with_shipping: String,
    total_price: String,
    product_name: String,
    link: String,
}

#[derive(Tabled, Serialize)]
struct RateRow {
    #[tabled(rename = "Currency")]
    #[serde(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Rate")]
    #[serde(rename = "Rate")]
    rate: String,
    #[tabled(rename = "CHF per 100")]
    #[serde(rename = "CHF per 100")]
    chf_per_100: String,
}

#[derive(Tabled, Serialize)]
struct ParseRow {
    #[tabled(rename = "Currency")]
    #[serde(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Shipping")]
    #[serde(rename = "Shipping")]
    shipping: String,
    #[tabled(rename = "Total CHF")]
    #[serde(rename = "Total CHF")]
    total: String,
}

/// The figures printed by the `parse` command.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    pub currency: Option<Currency>,
    pub price: Option<f64>,
    pub shipping: Option<f64>,
    pub total_price: f64,
}

// -- Row builders --

/// Amounts always carry two decimals; absent ones print as the placeholder.
fn format_amount(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn format_currency(currency: Option<Currency>) -> String {
    currency
        .map(|c| c.code().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn build_compact_rows(records: &[CanonicalRecord]) -> Vec<CompactRow> {
    records
        .iter()
        .map(|r| CompactRow {
            title: r.title.clone(),
            condition: r.condition.to_string(),
            total_price: format_amount(r.total_price),
            origin: r.origin.clone(),
            shipping_cost: format_amount(r.shipping_cost),
            link: r.link.clone(),
        })
        .collect()
}

fn build_extended_rows(records: &[CanonicalRecord]) -> Vec<ExtendedRow> {
    records
        .iter()
        .map(|r| ExtendedRow {
            title: r.title.clone(),
            condition: r.condition.to_string(),
            price: format_amount(r.price),
            currency: format_currency(r.currency),
            origin: r.origin.clone(),
            shipping_cost: format_amount(r.shipping_cost),
            price_with_shipping: format_amount(r.price_with_shipping),
            total_price: format_amount(r.total_price),
            product_name: r.product_name.clone(),
            link: r.link.clone(),
        })
        .collect()
}

fn build_rate_rows(rates: &RateTable) -> Vec<RateRow> {
    rates
        .iter()
        .map(|(currency, rate)| RateRow {
            currency: currency.code().to_string(),
            rate: format!("{:.4}", rate),
            chf_per_100: format!("{:.2}", 100.0 / rate),
        })
        .collect()
}

fn build_parse_rows(result: &ParseResult) -> Vec<ParseRow> {
    vec![ParseRow {
        currency: format_currency(result.currency),
        price: format_amount(result.price),
        shipping: format_amount(result.shipping),
        total: format!("{:.2}", result.total_price),
    }]
}

// -- Rendering --

fn render_table<T: Tabled>(rows: Vec<T>, markdown: bool) -> String {
    let mut table = Table::new(rows);
    if markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes cleaned records as CSV in the given column layout.
pub fn write_records_csv<W: Write>(
    writer: W,
    records: &[CanonicalRecord],
    layout: OutputLayout,
) -> Result<()> {
    match layout {
        OutputLayout::Compact => write_csv(writer, &build_compact_rows(records)),
        OutputLayout::Extended => write_csv(writer, &build_extended_rows(records)),
    }
}

pub fn print_records(
    records: &[CanonicalRecord],
    layout: OutputLayout,
    format: &OutputFormat,
) -> Result<()> {
    let markdown = *format == OutputFormat::Markdown;
    match format {
        OutputFormat::Json => println!("{}", records_json(records, layout)?),
        OutputFormat::Csv => write_records_csv(std::io::stdout(), records, layout)?,
        OutputFormat::Table | OutputFormat::Markdown => {
            let rendered = match layout {
                OutputLayout::Compact => render_table(build_compact_rows(records), markdown),
                OutputLayout::Extended => render_table(build_extended_rows(records), markdown),
            };
            println!("{}", rendered);
        }
    }
    Ok(())
}

pub fn print_rates(rates: &RateTable, format: &OutputFormat) -> Result<()> {
    let rows = build_rate_rows(rates);
    match format {
        OutputFormat::Json => print_json(rates),
        OutputFormat::Csv => write_csv(std::io::stdout(), &rows)?,
        OutputFormat::Table => println!("{}", render_table(rows, false)),
        OutputFormat::Markdown => println!("{}", render_table(rows, true)),
    }
    Ok(())
}

pub fn print_parse_result(result: &ParseResult, format: &OutputFormat) -> Result<()> {
    let rows = build_parse_rows(result);
    match format {
        OutputFormat::Json => print_json(result),
        OutputFormat::Csv => write_csv(std::io::stdout(), &rows)?,
        OutputFormat::Table => println!("{}", render_table(rows, false)),
        OutputFormat::Markdown => println!("{}", render_table(rows, true)),
    }
    Ok(())
}

// -- JSON output --

/// Cleaned records as a JSON array using the same columns and amount
/// formatting as the CSV output.
pub fn records_json(records: &[CanonicalRecord], layout: OutputLayout) -> Result<String> {
    let json = match layout {
        OutputLayout::Compact => serde_json::to_string_pretty(&build_compact_rows(records))?,
        OutputLayout::Extended => serde_json::to_string_pretty(&build_extended_rows(records))?,
    };
    Ok(json)
}

pub fn print_json<T: serde::Serialize + ?Sized>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
