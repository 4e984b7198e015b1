// HTTP client for the sec-api.io Query API (filing index search).
//
// The Query API takes a Lucene-style query string plus pagination and sort
// parameters in a JSON body, and answers with a page of filing metadata.
// API docs: https://sec-api.io/docs/query-api

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use tracing::debug;

use super::traits::{FilingIndexService, FilingMetadata, FilingQuery};

/// Default Query API endpoint.
pub const DEFAULT_QUERY_API_URL: &str = "https://api.sec-api.io";

/// Filing index client backed by the sec-api.io Query API.
pub struct SecQueryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SecQueryClient {
    /// Create a client for the given endpoint. `timeout` bounds each request.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("filingscan/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl FilingIndexService for SecQueryClient {
    async fn fetch_page(&self, query: &FilingQuery) -> Result<Vec<FilingMetadata>> {
        let payload = QueryPayload::from(query);

        debug!(year = query.year, from = query.from, "Query API request");

        let response = self
            .client
            .post(&self.base_url)
            .query(&[("token", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Query API request failed for {}", query.year))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Query API returned {}: {}", status, body);
        }

        let page: QueryResponse = response
            .json()
            .await
            .context("Failed to parse Query API response")?;

        Ok(page.filings)
    }
}

// --- Query API request/response types ---

#[derive(Debug, Serialize)]
pub struct QueryPayload {
    query: QueryClause,
    from: String,
    size: String,
    sort: Vec<SortClause>,
}

impl From<&FilingQuery> for QueryPayload {
    fn from(query: &FilingQuery) -> Self {
        Self {
            query: QueryClause {
                query_string: QueryString {
                    query: query.query_string(),
                },
            },
            from: query.from.to_string(),
            size: query.size.to_string(),
            sort: vec![SortClause {
                filed_at: SortOrder {
                    order: "asc".to_string(),
                },
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct QueryClause {
    query_string: QueryString,
}

#[derive(Debug, Serialize)]
struct QueryString {
    query: String,
}

#[derive(Debug, Serialize)]
struct SortClause {
    #[serde(rename = "filedAt")]
    filed_at: SortOrder,
}

#[derive(Debug, Serialize)]
struct SortOrder {
    order: String,
}

/// A page of results from the Query API.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub filings: Vec<FilingMetadata>,
}
