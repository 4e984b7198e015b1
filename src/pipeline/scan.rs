// Stages 2 and 3: extract and score every filing on a bounded worker pool.
//
// Filings are independent, so up to `concurrency` of them are in flight at
// once. Results come back in index order. The extraction client's own rate
// limiter is what keeps the pool under the service quota.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::edgar::traits::SectionExtractor;
use crate::keywords::scorer;
use crate::keywords::vocabulary::Vocabulary;
use crate::models::{EnrichedFilingRecord, FilingIndexRecord, ItemSection};

use super::extract::extract_sections;
use super::{CancelFlag, PipelineConfig};

/// Extract and score a single filing.
pub async fn process_filing(
    extractor: &dyn SectionExtractor,
    vocabulary: &Vocabulary,
    config: &PipelineConfig,
    filing: FilingIndexRecord,
) -> EnrichedFilingRecord {
    let sections = extract_sections(
        extractor,
        &filing.filing_url,
        &config.items,
        config.request_timeout,
    )
    .await
    .into_iter()
    .map(|(item, text)| {
        let counts = scorer::score(&text, vocabulary);
        ItemSection { item, text, counts }
    })
    .collect();

    EnrichedFilingRecord { filing, sections }
}

/// Process every filing, at most `config.concurrency` at a time.
///
/// Once `cancel` is set no further filings start; the ones in flight finish
/// and are included in the result.
pub async fn scan_filings(
    extractor: &dyn SectionExtractor,
    vocabulary: &Vocabulary,
    config: &PipelineConfig,
    filings: Vec<FilingIndexRecord>,
    cancel: &CancelFlag,
) -> Vec<EnrichedFilingRecord> {
    let total = filings.len();
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Scanning [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<EnrichedFilingRecord> = stream::iter(filings)
        .take_while(|_| futures::future::ready(!cancel.is_cancelled()))
        .map(|filing| {
            let pb = pb.clone();
            async move {
                let record = process_filing(extractor, vocabulary, config, filing).await;
                pb.inc(1);
                record
            }
        })
        .buffered(config.concurrency.max(1))
        .collect()
        .await;

    pb.finish_and_clear();

    if results.len() < total {
        info!(
            processed = results.len(),
            total, "Scan cancelled before all filings were processed"
        );
    } else {
        info!(processed = results.len(), "Keyword scan complete");
    }

    results
}
