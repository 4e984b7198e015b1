// In-memory fakes for the two service traits.
//
// ScriptedIndex answers page requests from a per-year script of page sizes
// and records every query it receives. MapExtractor serves section text from
// a (url, item) map and fails for anything unregistered.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use filingscan::edgar::traits::{FilingIndexService, FilingMetadata, FilingQuery, SectionExtractor};

/// Filing index fake: each year maps to a list of page outcomes.
pub struct ScriptedIndex {
    pages: HashMap<i32, Vec<Page>>,
    pub queries: Mutex<Vec<FilingQuery>>,
}

#[derive(Clone)]
pub enum Page {
    /// A page with this many generated filings.
    Filings(usize),
    /// A page with exactly these filings.
    Exact(Vec<FilingMetadata>),
    /// A failed request.
    Error,
}

impl ScriptedIndex {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn year(mut self, year: i32, pages: Vec<Page>) -> Self {
        self.pages.insert(year, pages);
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries_for(&self, year: i32) -> Vec<FilingQuery> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.year == year)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FilingIndexService for ScriptedIndex {
    async fn fetch_page(&self, query: &FilingQuery) -> Result<Vec<FilingMetadata>> {
        self.queries.lock().unwrap().push(query.clone());

        let page_no = (query.from / query.size) as usize;
        let page = self
            .pages
            .get(&query.year)
            .and_then(|pages| pages.get(page_no))
            .cloned();

        match page {
            None => Ok(Vec::new()),
            Some(Page::Error) => bail!("simulated query failure"),
            Some(Page::Exact(filings)) => Ok(filings),
            Some(Page::Filings(n)) => Ok((0..n)
                .map(|i| {
                    let seq = query.from as usize + i;
                    metadata(
                        &format!("{}{:05}", query.year, seq),
                        &format!("{}-03-01T10:00:00-05:00", query.year),
                        &format!("https://sec.example/{}/{}", query.year, seq),
                    )
                })
                .collect()),
        }
    }
}

pub fn metadata(cik: &str, filed_at: &str, url: &str) -> FilingMetadata {
    FilingMetadata {
        cik: cik.to_string(),
        filed_at: filed_at.to_string(),
        period_of_report: "2024-12-31".to_string(),
        company_name: format!("Company {cik}"),
        link_to_filing_details: url.to_string(),
        sic: "3711".to_string(),
    }
}

/// Section extractor fake keyed by (filing url, item).
pub struct MapExtractor {
    sections: HashMap<(String, String), String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MapExtractor {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on(mut self, url: &str, item: &str, text: &str) -> Self {
        self.sections
            .insert((url.to_string(), item.to_string()), text.to_string());
        self
    }
}

#[async_trait]
impl SectionExtractor for MapExtractor {
    async fn extract_section(&self, filing_url: &str, item: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((filing_url.to_string(), item.to_string()));
        match self.sections.get(&(filing_url.to_string(), item.to_string())) {
            Some(text) => Ok(text.clone()),
            None => bail!("no section {item} for {filing_url}"),
        }
    }
}

/// Extractor that never answers, for timeout tests.
pub struct HangingExtractor;

#[async_trait]
impl SectionExtractor for HangingExtractor {
    async fn extract_section(&self, _filing_url: &str, _item: &str) -> Result<String> {
        std::future::pending().await
    }
}
