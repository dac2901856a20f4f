//! Response types for the `latest` exchange-rate endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /v6/latest/{BASE}`.
///
/// `rates` holds units of each currency per one unit of the base currency.
/// Error bodies only carry `result` and `error-type`, so everything else
/// is optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LatestRates {
    pub result: String,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub time_last_update_unix: Option<i64>,
    #[serde(default)]
    pub time_next_update_unix: Option<i64>,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    #[serde(rename = "error-type", default)]
    pub error_type: Option<String>,
}

impl LatestRates {
    /// Returns true when the endpoint reported success.
    pub fn is_success(&self) -> bool {
        self.result.eq_ignore_ascii_case("success")
    }

    /// Units of `code` per one unit of the base currency, if quoted.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_uppercase()).copied()
    }

    /// Timestamp of the provider's last rate update.
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.time_last_update_unix
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}
