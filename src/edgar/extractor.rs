// HTTP client for the sec-api.io Extractor API (item section text).
//
// One GET per (filing, item) returns the section as plain text. All calls
// share a single rate limiter since the API enforces per-key quotas.
// API docs: https://sec-api.io/docs/sec-filings-item-extraction-api

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::time::Duration;
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::SectionExtractor;

/// Default Extractor API endpoint.
pub const DEFAULT_EXTRACTOR_API_URL: &str = "https://api.sec-api.io/extractor";

/// Section extractor backed by the sec-api.io Extractor API.
pub struct SecExtractorClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl SecExtractorClient {
    /// Create a client for the given endpoint. `timeout` bounds each request;
    /// `requests_per_second` is shared across every caller of this client.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        requests_per_second: f64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("filingscan/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            rate_limiter: RateLimiter::new(requests_per_second),
        })
    }
}

#[async_trait]
impl SectionExtractor for SecExtractorClient {
    async fn extract_section(&self, filing_url: &str, item: &str) -> Result<String> {
        self.rate_limiter.acquire().await;

        debug!(filing_url, item, "Extractor API request");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("url", filing_url),
                ("item", item),
                ("type", "text"),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Extractor API request failed for item {item}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Extractor API returned {} for item {}: {}", status, item, body);
        }

        response
            .text()
            .await
            .context("Failed to read Extractor API response")
    }
}
