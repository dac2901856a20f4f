//! Extraction of currency, price and shipping cost from a listing's raw
//! price and shipping fields.

use serde::Serialize;

use crate::amount::ParsedAmount;
use crate::currency::{detect_currency, Currency};

/// Default markers of free shipping, matched case-insensitively as substrings.
pub const DEFAULT_FREE_SHIPPING_MARKERS: &[&str] = &["kostenlos", "gratis"];

/// Currency and amounts pulled out of one listing.
///
/// `None` amounts mean the text held nothing parsable. The price is the
/// listing's own number; shipping is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtractedFields {
    pub currency: Option<Currency>,
    pub price: Option<f64>,
    pub shipping: Option<f64>,
}

impl ExtractedFields {
    /// Price with "nothing parsable" collapsed to `0.00`.
    pub fn price_value(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Shipping with "nothing parsable" collapsed to `0.00`.
    pub fn shipping_value(&self) -> f64 {
        self.shipping.unwrap_or(0.0)
    }
}

/// Applies currency detection and amount parsing to price/shipping pairs.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    free_shipping_markers: Vec<String>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_FREE_SHIPPING_MARKERS.iter().copied())
    }
}

impl FieldExtractor {
    /// Creates an extractor with a custom list of free-shipping markers.
    pub fn new<I, S>(free_shipping_markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            free_shipping_markers: free_shipping_markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// True if the shipping text announces free shipping.
    pub fn is_free_shipping(&self, shipping_text: Option<&str>) -> bool {
        let Some(text) = shipping_text else {
            return false;
        };
        let lower = text.to_lowercase();
        self.free_shipping_markers
            .iter()
            .any(|marker| lower.contains(marker.as_str()))
    }

    /// Extracts currency, price and shipping.
    ///
    /// The currency comes from the price text, falling back to the shipping
    /// text. A free-shipping marker forces shipping to `0.00` whatever
    /// digits the text also contains.
    pub fn extract(&self, price_text: Option<&str>, shipping_text: Option<&str>) -> ExtractedFields {
        let price = ParsedAmount::from_text(price_text);
        let currency = price.currency.or_else(|| detect_currency(shipping_text));
        let shipping = if self.is_free_shipping(shipping_text) {
            Some(0.0)
        } else {
            ParsedAmount::from_text(shipping_text).amount
        };
        ExtractedFields {
            currency,
            price: price.amount,
            shipping,
        }
    }
}
