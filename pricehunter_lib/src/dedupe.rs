//! Removal of repeated listings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::record::CanonicalRecord;
use crate::text::fold_for_key;

/// How listings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupStrategy {
    /// Title and link compared as they are.
    Exact,
    /// Title folded to lower-case ASCII without punctuation, link
    /// lower-cased.
    #[default]
    Normalized,
}

/// Identity of a listing: title, total and link.
pub fn dedup_key(record: &CanonicalRecord, strategy: DedupStrategy) -> (String, String, String) {
    let total = record
        .total_price
        .map(|t| format!("{:.2}", t))
        .unwrap_or_else(|| "-".to_string());
    match strategy {
        DedupStrategy::Exact => (record.title.clone(), total, record.link.clone()),
        DedupStrategy::Normalized => (
            fold_for_key(&record.title),
            total,
            record.link.trim().to_lowercase(),
        ),
    }
}

/// Keeps the first occurrence of each listing, preserving order.
pub fn dedupe(records: Vec<CanonicalRecord>, strategy: DedupStrategy) -> Vec<CanonicalRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record, strategy)))
        .collect()
}
