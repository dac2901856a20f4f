//! Conversion of local prices into the CHF settlement currency.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::amount::round2;
use crate::currency::Currency;

/// Fallback rates used when no fresh or cached table is available.
pub const DEFAULT_RATES: &[(Currency, f64)] = &[
    (Currency::Eur, 0.95),
    (Currency::Usd, 0.88),
    (Currency::Gbp, 0.77),
    (Currency::Chf, 1.0),
];

/// Exchange rates keyed by currency.
///
/// `amount_in_chf = amount / rate`. CHF is always `1.0`; a currency without
/// a usable rate converts at `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<Currency, f64>,
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RateTable {
    /// A table holding only the settlement currency.
    pub fn new() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(Currency::Chf, 1.0);
        Self { rates }
    }

    /// The hardcoded fallback table.
    pub fn defaults() -> Self {
        Self::from_rates(DEFAULT_RATES.iter().copied())
    }

    pub fn from_rates<I>(rates: I) -> Self
    where
        I: IntoIterator<Item = (Currency, f64)>,
    {
        let mut table = Self::new();
        for (currency, rate) in rates {
            table.insert(currency, rate);
        }
        table
    }

    /// Sets the rate for `currency`. Non-positive or non-finite rates are
    /// dropped, and CHF stays pinned at `1.0`.
    pub fn insert(&mut self, currency: Currency, rate: f64) {
        if currency == Currency::Chf {
            return;
        }
        if !rate.is_finite() || rate <= 0.0 {
            tracing::warn!("ignoring unusable {} rate {}", currency, rate);
            return;
        }
        self.rates.insert(currency, rate);
    }

    /// The stored rate for `currency`, if any.
    pub fn get(&self, currency: Currency) -> Option<f64> {
        self.rates.get(&currency).copied()
    }

    /// The rate to divide by; `1.0` for absent or unknown currencies.
    pub fn rate(&self, currency: Option<Currency>) -> f64 {
        currency
            .and_then(|c| self.get(c))
            .filter(|rate| rate.is_finite() && *rate > 0.0)
            .unwrap_or(1.0)
    }

    /// Whether every one of `currencies` has a stored rate.
    pub fn covers(&self, currencies: &[Currency]) -> bool {
        currencies.iter().all(|c| self.rates.contains_key(c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, f64)> + '_ {
        self.rates.iter().map(|(c, r)| (*c, *r))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Total of price plus shipping in CHF, rounded to 2 decimals.
///
/// A zero price means no price could be read, so the total is `0.00` rather
/// than a total built from shipping alone.
pub fn convert_total(price: f64, shipping: f64, currency: Option<Currency>, rates: &RateTable) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    round2((price + shipping) / rates.rate(currency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euro_total_is_divided_by_rate() {
        let rates = RateTable::from_rates([(Currency::Eur, 0.95)]);
        assert_eq!(
            convert_total(3040.06, 12.0, Some(Currency::Eur), &rates),
            3212.69
        );
    }

    #[test]
    fn chf_is_always_one() {
        let mut rates = RateTable::from_rates([(Currency::Chf, 0.5)]);
        rates.insert(Currency::Chf, 3.0);
        assert_eq!(rates.get(Currency::Chf), Some(1.0));
        assert_eq!(
            convert_total(1234.56, 0.0, Some(Currency::Chf), &rates),
            1234.56
        );
    }

    #[test]
    fn zero_price_means_zero_total() {
        let rates = RateTable::defaults();
        assert_eq!(convert_total(0.0, 25.0, Some(Currency::Eur), &rates), 0.0);
    }

    #[test]
    fn unknown_currency_uses_rate_one() {
        let rates = RateTable::new();
        assert_eq!(convert_total(100.0, 9.5, None, &rates), 109.5);
        assert_eq!(convert_total(100.0, 9.5, Some(Currency::Usd), &rates), 109.5);
    }

    #[test]
    fn corrupt_rates_are_not_stored() {
        let rates = RateTable::from_rates([
            (Currency::Eur, 0.0),
            (Currency::Usd, -2.0),
            (Currency::Gbp, f64::NAN),
        ]);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates.rate(Some(Currency::Eur)), 1.0);
        assert_eq!(convert_total(50.0, 0.0, Some(Currency::Gbp), &rates), 50.0);
    }

    #[test]
    fn defaults_cover_all_currencies() {
        let rates = RateTable::defaults();
        assert!(rates.covers(&Currency::ALL));
        assert_eq!(rates.get(Currency::Gbp), Some(0.77));
    }

    #[test]
    fn serializes_as_code_map() {
        let rates = RateTable::from_rates([(Currency::Eur, 0.95)]);
        let json = serde_json::to_value(&rates).unwrap();
        assert_eq!(json, serde_json::json!({"CHF": 1.0, "EUR": 0.95}));
    }
}
