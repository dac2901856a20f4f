//! Column resolution and batch-level validation of scraped tables.
//!
//! Producers name their columns differently ("Titel" vs "title", "Preis" vs
//! "Price"), so every logical field is looked up through a fixed alias list.
//! Validation runs before any row is transformed and reports every missing
//! column at once.

use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::RawRecord;

/// Maximum number of row numbers listed in an error message.
pub const MAX_REPORTED_ROWS: usize = 10;

/// A table of scraped cells: one header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at `row`/`col`; blank or missing cells are `None`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty())
    }
}

/// Logical input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Condition,
    Price,
    Origin,
    Shipping,
    Link,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Condition,
        Field::Price,
        Field::Origin,
        Field::Shipping,
        Field::Link,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Condition => "condition",
            Field::Price => "price",
            Field::Origin => "origin",
            Field::Shipping => "shipping",
            Field::Link => "link",
        }
    }

    /// Accepted header names, matched case-insensitively after trimming.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Title => &["Titel", "title"],
            Field::Condition => &["Zustand", "Condition", "Aktualitaet"],
            Field::Price => &["Preis", "Price"],
            Field::Origin => &["Land", "Country", "Herkunft", "Region"],
            Field::Shipping => &["Versandkosten", "Versand", "Shipping"],
            Field::Link => &["Link"],
        }
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.name(), self.aliases().join(", "))
    }
}

/// Which logical columns must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequiredColumns {
    /// Price and a URL-bearing column.
    #[default]
    Core,
    /// Every logical field plus a URL-bearing column.
    All,
}

impl RequiredColumns {
    fn fields(&self) -> &'static [Field] {
        match self {
            RequiredColumns::Core => &[Field::Price],
            RequiredColumns::All => &Field::ALL,
        }
    }
}

/// Validation failures that abort a whole batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing required column(s): {}", .missing.join("; "))]
    MissingColumns { missing: Vec<String> },
    #[error("{count} row(s) without a product name in their URL: rows {}", format_rows(.rows, .count))]
    MissingProductName { count: usize, rows: Vec<usize> },
    #[error("{count} row(s) with an unparsable price: rows {}", format_rows(.rows, .count))]
    UnparsablePrice { count: usize, rows: Vec<usize> },
}

/// Builds a row-level error from 0-based row indices.
pub(crate) fn row_error(
    rows: &[usize],
    make: impl FnOnce(usize, Vec<usize>) -> SchemaError,
) -> SchemaError {
    let listed = rows.iter().take(MAX_REPORTED_ROWS).map(|r| r + 1).collect();
    make(rows.len(), listed)
}

fn format_rows(rows: &[usize], count: &usize) -> String {
    let mut out = rows
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if *count > rows.len() {
        let _ = write!(out, " and {} more", count - rows.len());
    }
    out
}

fn url_regex() -> &'static Regex {
    static URL: OnceLock<Regex> = OnceLock::new();
    URL.get_or_init(|| Regex::new(r"(?i)https?://").expect("url regex is valid"))
}

/// Positions of the logical fields in a table's header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    title: Option<usize>,
    condition: Option<usize>,
    price: Option<usize>,
    origin: Option<usize>,
    shipping: Option<usize>,
    link: Option<usize>,
    url: Option<usize>,
}

impl ColumnMap {
    /// Resolves header aliases and the URL-bearing column.
    ///
    /// The URL column is the first column, in header order, with a cell
    /// that contains an `http(s)://` link. A table without such a cell
    /// falls back to its link column.
    pub fn resolve(table: &RawTable) -> Self {
        let find = |field: Field| {
            field.aliases().iter().find_map(|alias| {
                table
                    .headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(alias))
            })
        };
        let link = find(Field::Link);
        let url = (0..table.headers.len())
            .find(|&col| {
                table
                    .rows
                    .iter()
                    .any(|row| row.get(col).is_some_and(|c| url_regex().is_match(c)))
            })
            .or(link);

        Self {
            title: find(Field::Title),
            condition: find(Field::Condition),
            price: find(Field::Price),
            origin: find(Field::Origin),
            shipping: find(Field::Shipping),
            link,
            url,
        }
    }

    /// Checks that the columns `required` asks for were found.
    pub fn check(&self, required: RequiredColumns) -> Result<(), SchemaError> {
        let mut missing: Vec<String> = required
            .fields()
            .iter()
            .filter(|f| self.column(**f).is_none())
            .map(Field::describe)
            .collect();
        if self.url.is_none() {
            missing.push("url (a column holding http(s) links)".to_string());
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns { missing })
        }
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        match field {
            Field::Title => self.title,
            Field::Condition => self.condition,
            Field::Price => self.price,
            Field::Origin => self.origin,
            Field::Shipping => self.shipping,
            Field::Link => self.link,
        }
    }

    pub fn url_column(&self) -> Option<usize> {
        self.url
    }

    /// The record at data row `row` (0-based).
    ///
    /// The output link is taken from the link column, else the URL column.
    pub fn record(&self, table: &RawTable, row: usize) -> RawRecord {
        let cell = |col: Option<usize>| col.and_then(|c| table.cell(row, c)).map(str::to_string);
        RawRecord {
            title: cell(self.title),
            condition: cell(self.condition),
            price: cell(self.price),
            origin: cell(self.origin),
            shipping: cell(self.shipping),
            link: cell(self.link.or(self.url)),
            url: cell(self.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn resolves_german_headers() {
        let t = table(
            &["Titel", "Zustand", "Preis", "Land", "Versandkosten", "Link"],
            &[&["Strat", "Neu", "CHF 10", "aus Schweiz", "gratis", "https://r.ch/?skw=strat"]],
        );
        let map = ColumnMap::resolve(&t);
        assert_eq!(map.column(Field::Title), Some(0));
        assert_eq!(map.column(Field::Shipping), Some(4));
        assert_eq!(map.url_column(), Some(5));
        assert!(map.check(RequiredColumns::All).is_ok());
    }

    #[test]
    fn aliases_are_case_insensitive_and_trimmed() {
        let t = table(&[" PRICE ", "country", "url"], &[&["1", "CH", "http://x"]]);
        let map = ColumnMap::resolve(&t);
        assert_eq!(map.column(Field::Price), Some(0));
        assert_eq!(map.column(Field::Origin), Some(1));
        assert_eq!(map.url_column(), Some(2));
        assert_eq!(map.column(Field::Link), None);
        assert!(map.check(RequiredColumns::Core).is_ok());
    }

    #[test]
    fn earlier_alias_wins() {
        let t = table(&["Versand", "Versandkosten"], &[]);
        assert_eq!(ColumnMap::resolve(&t).column(Field::Shipping), Some(1));
    }

    #[test]
    fn first_url_column_in_header_order() {
        let t = table(
            &["Titel", "Bild", "Link"],
            &[&["a", "", "https://shop/1"], &["b", "https://img/2.jpg", "https://shop/2"]],
        );
        assert_eq!(ColumnMap::resolve(&t).url_column(), Some(1));
    }

    #[test]
    fn link_column_is_fallback_url_column() {
        let t = table(&["Preis", "Link"], &[]);
        let map = ColumnMap::resolve(&t);
        assert_eq!(map.url_column(), Some(1));
        assert!(map.check(RequiredColumns::Core).is_ok());
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let t = table(&["Titel", "Zustand"], &[&["a", "neu"]]);
        let err = ColumnMap::resolve(&t).check(RequiredColumns::All).unwrap_err();
        let SchemaError::MissingColumns { missing } = &err else {
            panic!("unexpected error {:?}", err);
        };
        assert_eq!(missing.len(), 5);
        assert!(missing[0].starts_with("price"));
        assert!(missing.last().unwrap().starts_with("url"));
        assert!(err.to_string().contains("price (Preis, Price)"));
    }

    #[test]
    fn core_only_needs_price_and_url() {
        let t = table(&["Titel"], &[&["a"]]);
        let err = ColumnMap::resolve(&t).check(RequiredColumns::Core).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                missing: vec![
                    "price (Preis, Price)".to_string(),
                    "url (a column holding http(s) links)".to_string()
                ]
            }
        );
    }

    #[test]
    fn record_reads_cells_and_link_fallback() {
        let t = table(
            &["Titel", "Preis", "Adresse"],
            &[&["Les Paul", "  ", "https://r.ch/?skw=lp"]],
        );
        let map = ColumnMap::resolve(&t);
        let rec = map.record(&t, 0);
        assert_eq!(rec.title.as_deref(), Some("Les Paul"));
        assert_eq!(rec.price, None);
        assert_eq!(rec.link.as_deref(), Some("https://r.ch/?skw=lp"));
        assert_eq!(rec.url, rec.link);
        assert_eq!(rec.origin, None);
    }

    #[test]
    fn row_errors_are_one_based_and_capped() {
        let rows: Vec<usize> = (0..12).collect();
        let err = row_error(&rows, |count, rows| SchemaError::UnparsablePrice { count, rows });
        let SchemaError::UnparsablePrice { count, rows } = &err else {
            panic!("unexpected error {:?}", err);
        };
        assert_eq!(*count, 12);
        assert_eq!(rows.first(), Some(&1));
        assert_eq!(rows.len(), MAX_REPORTED_ROWS);
        assert!(err.to_string().ends_with("9, 10 and 2 more"));
    }
}
