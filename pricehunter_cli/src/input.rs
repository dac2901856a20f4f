//! Reading scraped CSV exports into a [`RawTable`].

use std::path::Path;

use anyhow::{Context, Result};
use pricehunter_lib::RawTable;

const UTF8_BOM: char = '\u{feff}';

/// Decodes file bytes as UTF-8, falling back to Latin-1 for older exports.
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_string(),
            None => text,
        },
        Err(e) => {
            tracing::warn!("input is not valid UTF-8, reading it as Latin-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Parses CSV text. Short rows are allowed; missing cells read as empty.
pub fn parse_table(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", i + 1))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable::new(headers, rows))
}

pub fn read_table(path: &Path, delimiter: u8) -> Result<RawTable> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let table = parse_table(&decode(bytes), delimiter)?;
    tracing::info!("read {} rows from {}", table.len(), path.display());
    Ok(table)
}
