use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::time::Duration;

use crate::edgar::extractor::DEFAULT_EXTRACTOR_API_URL;
use crate::edgar::query::DEFAULT_QUERY_API_URL;
use crate::edgar::rate_limiter;
use crate::keywords::categories::CategorySets;
use crate::pipeline::PipelineConfig;

/// Central configuration loaded from environment variables.
///
/// The API key comes from the environment (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// sec-api.io API key, used by both the Query and Extractor APIs.
    pub sec_api_key: String,
    /// CSV file with the `keyword` column to scan for.
    pub keyword_file_path: PathBuf,
    pub form_type: String,
    /// Items to analyze (e.g. "1" for Business, "1A" for Risk Factors).
    pub items: Vec<String>,
    pub start_year: i32,
    pub end_year: i32,
    /// Directory the output tables are written to.
    pub output_dir: PathBuf,
    /// Prefix for output file names.
    pub filename_prefix: String,
    pub query_api_url: String,
    pub extractor_api_url: String,
    /// Shared request rate for the Extractor API.
    pub extractor_requests_per_second: f64,
    pub request_timeout: Duration,
    /// Scan only the loaded vocabulary, even if it misses category terms.
    pub strict_vocabulary: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything except the API key has a default; the key is only checked
    /// by commands that call the API (see `require_api_key`).
    pub fn load() -> Result<Self> {
        let items = env::var("ITEMS_TO_ANALYZE")
            .map(|raw| parse_items(&raw))
            .unwrap_or_else(|_| default_items());
        if items.is_empty() {
            anyhow::bail!("ITEMS_TO_ANALYZE is set but lists no items");
        }

        let start_year = parse_var("START_YEAR", 2018)?;
        let end_year = parse_var("END_YEAR", 2025)?;
        let timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", 60)?;

        Ok(Self {
            sec_api_key: env::var("SEC_API_KEY").unwrap_or_default(),
            keyword_file_path: env::var("KEYWORD_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("keywords.csv")),
            form_type: env::var("FORM_TYPE").unwrap_or_else(|_| "10-K".to_string()),
            items,
            start_year,
            end_year,
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
            filename_prefix: env::var("FILENAME_PREFIX")
                .unwrap_or_else(|_| "Earnings_Management_Analysis_EventYear2025".to_string()),
            query_api_url: env::var("SEC_QUERY_API_URL")
                .unwrap_or_else(|_| DEFAULT_QUERY_API_URL.to_string()),
            extractor_api_url: env::var("SEC_EXTRACTOR_API_URL")
                .unwrap_or_else(|_| DEFAULT_EXTRACTOR_API_URL.to_string()),
            extractor_requests_per_second: parse_rate("EXTRACTOR_REQUESTS_PER_SECOND", 10.0)?,
            request_timeout: Duration::from_secs(timeout_secs),
            strict_vocabulary: matches!(
                env::var("FILINGSCAN_STRICT_VOCABULARY").as_deref(),
                Ok("1") | Ok("true")
            ),
        })
    }

    /// Check that the sec-api.io key is configured.
    /// Call this before any operation that talks to the API.
    pub fn require_api_key(&self) -> Result<()> {
        if self.sec_api_key.is_empty() || self.sec_api_key == "YOUR_SEC_API_KEY_HERE" {
            anyhow::bail!(
                "SEC_API_KEY not set. Add your sec-api.io key to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Build the immutable pipeline settings. `concurrency` comes from the CLI.
    pub fn pipeline(&self, concurrency: usize) -> Result<PipelineConfig> {
        if self.start_year > self.end_year {
            anyhow::bail!(
                "Start year {} is after end year {}",
                self.start_year,
                self.end_year
            );
        }
        Ok(PipelineConfig {
            form_type: self.form_type.clone(),
            items: self.items.clone(),
            start_year: self.start_year,
            end_year: self.end_year,
            categories: CategorySets::default(),
            concurrency: concurrency.max(1),
            request_timeout: self.request_timeout,
            strict_vocabulary: self.strict_vocabulary,
        })
    }
}

fn default_items() -> Vec<String> {
    ["1", "1A", "2", "7"].iter().map(|s| s.to_string()).collect()
}

/// Split a comma-separated item list, e.g. "1, 1a ,7" -> ["1", "1A", "7"].
fn parse_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

/// Parse a requests-per-second setting, rejecting rates the limiter can't honor.
fn parse_rate(name: &str, default: f64) -> Result<f64> {
    let rate = parse_var(name, default)?;
    rate_limiter::interval_for(rate).with_context(|| format!("{name} is out of range"))?;
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items() {
        assert_eq!(parse_items("1, 1a ,,7"), vec!["1", "1A", "7"]);
        assert!(parse_items(" , ").is_empty());
    }

    #[test]
    fn test_parse_var_default_when_unset() {
        let v: i32 = parse_var("FILINGSCAN_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn test_parse_rate_rejects_tiny_rates() {
        let name = "FILINGSCAN_TEST_RATE_VAR";
        std::env::set_var(name, "1e-20");
        assert!(parse_rate(name, 10.0).is_err());
        std::env::set_var(name, "2.5");
        assert_eq!(parse_rate(name, 10.0).unwrap(), 2.5);
        std::env::set_var(name, "0");
        assert_eq!(parse_rate(name, 10.0).unwrap(), 0.0);
        std::env::remove_var(name);
        assert_eq!(parse_rate(name, 10.0).unwrap(), 10.0);
    }

    #[test]
    fn test_require_api_key_rejects_placeholder() {
        let mut config = Config::load().unwrap();
        config.sec_api_key = "YOUR_SEC_API_KEY_HERE".to_string();
        assert!(config.require_api_key().is_err());
        config.sec_api_key = "abc123".to_string();
        assert!(config.require_api_key().is_ok());
    }

    #[test]
    fn test_pipeline_rejects_inverted_years() {
        let mut config = Config::load().unwrap();
        config.start_year = 2025;
        config.end_year = 2018;
        assert!(config.pipeline(4).is_err());
        config.start_year = 2018;
        let pipeline = config.pipeline(0).unwrap();
        assert_eq!(pipeline.concurrency, 1);
    }
}
