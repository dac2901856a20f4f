//! Input and output record shapes of the pipeline.

use serde::Serialize;

use crate::condition::Condition;
use crate::currency::Currency;

/// One scraped listing as read from the feed, after column resolution.
///
/// Every field is optional: producers omit columns and leave cells empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub title: Option<String>,
    pub condition: Option<String>,
    pub price: Option<String>,
    pub origin: Option<String>,
    pub shipping: Option<String>,
    pub link: Option<String>,
    /// Cell of the URL-bearing column the product name is read from.
    pub url: Option<String>,
}

/// A cleaned listing.
///
/// Amounts are in the listing's own currency except `total_price`, which is
/// in CHF. `None` amounts only occur with the not-available price policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub title: String,
    pub condition: Condition,
    pub origin: String,
    pub price: Option<f64>,
    pub currency: Option<Currency>,
    pub shipping_cost: Option<f64>,
    pub price_with_shipping: Option<f64>,
    pub total_price: Option<f64>,
    pub product_name: String,
    pub link: String,
}
