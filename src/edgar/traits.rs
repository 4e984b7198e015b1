// Service traits for the two external collaborators of the pipeline.
//
// FilingIndexService lists filings page by page; SectionExtractor returns the
// raw text of one item of one filing. Both are async because every
// implementation we ship is an HTTP API.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::FilingIndexRecord;

/// One page request against the filing-metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingQuery {
    pub form_type: String,
    pub year: i32,
    /// Pagination offset (number of results to skip).
    pub from: u32,
    /// Page size.
    pub size: u32,
}

impl FilingQuery {
    /// Lucene-style query string: the form type, minus its amendment variant,
    /// filed within the calendar year.
    pub fn query_string(&self) -> String {
        format!(
            "formType:\"{form}\" AND NOT formType:\"{form}/A\" AND filedAt:[{year}-01-01 TO {year}-12-31]",
            form = self.form_type,
            year = self.year,
        )
    }
}

/// Filing metadata as returned by the service. Every field may be absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingMetadata {
    #[serde(default)]
    pub cik: String,
    /// Full filing timestamp, e.g. `2019-02-26T16:30:45-05:00`.
    #[serde(default)]
    pub filed_at: String,
    #[serde(default)]
    pub period_of_report: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub link_to_filing_details: String,
    #[serde(default)]
    pub sic: String,
}

impl FilingMetadata {
    /// Convert to an index record. The filing date keeps only the date part
    /// of `filedAt`; unparseable dates become `None`.
    pub fn into_record(self) -> FilingIndexRecord {
        let file_date = self.filed_at.split('T').next().and_then(parse_date);
        let report_date = parse_date(&self.period_of_report);
        FilingIndexRecord {
            cik: self.cik,
            file_date,
            report_date,
            company_name: self.company_name,
            filing_url: self.link_to_filing_details,
            sic: self.sic,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Lists filings from a filing-metadata service.
#[async_trait]
pub trait FilingIndexService: Send + Sync {
    /// Fetch one page of filings. An empty page means the result set is exhausted.
    async fn fetch_page(&self, query: &FilingQuery) -> Result<Vec<FilingMetadata>>;
}

/// Extracts the raw text of a single structural item from a filing.
#[async_trait]
pub trait SectionExtractor: Send + Sync {
    /// Return the raw (un-normalized) text of `item` in the filing at `filing_url`.
    async fn extract_section(&self, filing_url: &str, item: &str) -> Result<String>;
}
