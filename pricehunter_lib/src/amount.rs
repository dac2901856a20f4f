//! Locale-tolerant parsing of monetary amounts from scraped text.
//!
//! Marketplace feeds mix Swiss (`1'234.50`, `120.-`), German (`3.040,06`)
//! and English (`1,234.56`) notations, often surrounded by currency markers
//! and shipping vocabulary. Parsing never fails loudly: text without a usable
//! number yields no amount, which callers usually read as `0.00`.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::currency::{detect_currency, strip_currency_markers, Currency};

/// A parsed amount together with the currency found in the same text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParsedAmount {
    /// `None` when the text held no parsable number.
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
}

impl ParsedAmount {
    /// Parses both the amount and the currency marker of `text`.
    pub fn from_text(text: Option<&str>) -> Self {
        Self {
            amount: parse_amount_opt(text),
            currency: detect_currency(text),
        }
    }

    /// The amount, with "nothing parsable" collapsed to `0.00`.
    pub fn value(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `120.-` / `120,-` whole-unit notation.
fn whole_unit_regex() -> &'static Regex {
    static WHOLE_UNIT: OnceLock<Regex> = OnceLock::new();
    WHOLE_UNIT.get_or_init(|| Regex::new(r"(\d)([.,])[-–]").expect("whole-unit regex is valid"))
}

fn noise_regex() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    NOISE.get_or_init(|| {
        Regex::new(r"(?i)(versand|inkl\.?|exkl\.?|inklusive|zzgl\.?|\+)")
            .expect("noise regex is valid")
    })
}

/// Decides which of `.` and `,` is the decimal separator and rewrites the
/// number with a single `.` decimal point.
fn disambiguate_separators(s: &str) -> String {
    let has_dot = s.contains('.');
    let has_comma = s.contains(',');
    match (has_dot, has_comma) {
        (true, true) => {
            let last_dot = s.rfind('.');
            let last_comma = s.rfind(',');
            if last_comma > last_dot {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        (false, true) => match s.rsplit_once(',') {
            Some((head, tail)) if (1..=3).contains(&tail.trim().len()) => {
                format!("{}.{}", head.replace(',', ""), tail.trim())
            }
            _ => s.replace(',', ""),
        },
        // dots only (or neither): ambiguous, left for the float parser
        _ => s.to_string(),
    }
}

/// Drops `.` and `,` with no digit on either side, such as the dot of an
/// abbreviation (`ca.`, `MwSt.`) left behind by the character filter.
fn drop_detached_separators(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            if **c != '.' && **c != ',' {
                return true;
            }
            let before = i.checked_sub(1).and_then(|j| chars.get(j));
            let after = chars.get(i + 1);
            [before, after]
                .into_iter()
                .flatten()
                .any(|n| n.is_ascii_digit())
        })
        .map(|(_, c)| *c)
        .collect()
}

/// Parses an amount from free text, returning `None` when nothing usable
/// is found.
pub fn parse_amount_opt(text: Option<&str>) -> Option<f64> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }

    let s = whole_unit_regex().replace_all(text, "${1}${2}00");
    let s = noise_regex().replace_all(&s, " ");
    let s = strip_currency_markers(&s);
    let kept: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || c.is_whitespace())
        .collect();
    let kept = drop_detached_separators(&kept);
    let kept = kept.trim();
    if !kept.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let normalized = disambiguate_separators(kept);
    let compact: String = normalized.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(round2(value)),
        _ => {
            tracing::debug!("unparsable amount {:?} (normalized {:?})", text, compact);
            None
        }
    }
}

/// Parses an amount from free text; anything unparsable is `0.00`.
pub fn parse_amount(text: Option<&str>) -> f64 {
    parse_amount_opt(text).unwrap_or(0.0)
}
