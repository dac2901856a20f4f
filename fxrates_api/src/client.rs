//! HTTP client for the open.er-api.com exchange-rate endpoint.

use std::time::Duration;

use url::Url;

use crate::{types::LatestRates, Error};

/// HTTP client for the open.er-api.com `latest` endpoint.
///
/// Each request builds a fresh `reqwest::Client` with the configured
/// timeout (5 seconds by default). The endpoint needs no API key.
pub struct Client {
    /// Base URL for the API. Defaults to `https://open.er-api.com`.
    base_api_url: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the public open.er-api.com endpoint.
    pub fn new() -> Self {
        Self {
            base_api_url: "https://open.er-api.com".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    fn get_url(&self, path: &str) -> Result<Url, Error> {
        Url::parse(format!("{}{}", &self.base_api_url, path).as_str()).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })
    }

    /// Fetches the latest rates quoted against `base` (e.g. `CHF`).
    pub async fn latest(&self, base: &str) -> Result<LatestRates, Error> {
        let path = format!("/v6/latest/{}", base.trim().to_uppercase());
        let url = self.get_url(&path)?;
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get rates: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let parsed = serde_json::from_str::<LatestRates>(&body).map_err(|e| {
            let snippet = truncate_body(&body);
            tracing::error!("Failed to parse rates: {} | body: {}", e, snippet);
            Error::InvalidResponse(e.to_string())
        })?;

        if !parsed.is_success() {
            return Err(Error::Unsuccessful {
                error_type: parsed
                    .error_type
                    .clone()
                    .unwrap_or_else(|| parsed.result.clone()),
            });
        }

        Ok(parsed)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
