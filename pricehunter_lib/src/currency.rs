//! Currency codes and detection of currency markers in free text.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The closed set of currencies the marketplace feeds quote in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Chf,
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Chf, Currency::Eur, Currency::Usd, Currency::Gbp];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Chf => "CHF",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CHF" => Ok(Currency::Chf),
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(format!(
                "unknown currency '{}'. Valid values: CHF, EUR, USD, GBP",
                s
            )),
        }
    }
}

/// Textual and symbolic markers, upper-cased, with the currency they denote.
pub const CURRENCY_TOKENS: &[(&str, Currency)] = &[
    ("CHF", Currency::Chf),
    ("FR", Currency::Chf),
    ("FR.", Currency::Chf),
    ("SFR", Currency::Chf),
    ("SFR.", Currency::Chf),
    ("€", Currency::Eur),
    ("EUR", Currency::Eur),
    ("EURO", Currency::Eur),
    ("$", Currency::Usd),
    ("USD", Currency::Usd),
    ("£", Currency::Gbp),
    ("GBP", Currency::Gbp),
];

/// Alphabetic markers must not touch another letter on either side; symbols
/// match anywhere. Longer alternatives come first so `SFR.` wins over `FR`.
fn marker_regex() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)(?:^|[^\p{L}])(sfr\.?|fr\.?|chf|euro|eur|usd|gbp)(?:[^\p{L}]|$)|([€$£])")
            .expect("currency marker regex is valid")
    })
}

fn lookup(token: &str) -> Option<Currency> {
    let upper = token.to_uppercase();
    CURRENCY_TOKENS
        .iter()
        .find(|(marker, _)| *marker == upper)
        .map(|(_, currency)| *currency)
}

/// Detects the first currency marker in `text`.
///
/// Returns `None` for absent text or text without a marker. Digits alone
/// never produce a match.
pub fn detect_currency(text: Option<&str>) -> Option<Currency> {
    let text = text?;
    let caps = marker_regex().captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| lookup(m.as_str()))
}

/// Removes every currency marker from `text`, replacing it with a space.
pub(crate) fn strip_currency_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in marker_regex().captures_iter(text) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            out.push_str(&text[last..m.start()]);
            out.push(' ');
            last = m.end();
        }
    }
    out.push_str(&text[last..]);
    out
}
