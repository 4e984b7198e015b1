// End-to-end run: retrieve, scan, checkpoint, filter, write.
//
// An empty filing index or an empty relevant set is a normal, unproductive
// run (RunOutcome), not an error. Only configuration problems and failures to
// write the output tables are errors.

use anyhow::Result;
use tracing::{info, warn};

use crate::edgar::traits::{FilingIndexService, SectionExtractor};
use crate::keywords::vocabulary::Vocabulary;
use crate::models::RelevantFirmRecord;
use crate::output::csv as csv_out;
use crate::output::OutputPaths;

use super::relevance::filter_relevant;
use super::retrieve::fetch_filing_index;
use super::scan::scan_filings;
use super::{CancelFlag, PipelineConfig};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The filing index came back empty; nothing was scanned or written.
    NoFilings,
    /// Filings were scanned and the raw scan written, but none passed the filter.
    NoRelevantFirms { scanned: usize },
    /// Both output tables were written.
    Complete {
        scanned: usize,
        relevant: Vec<RelevantFirmRecord>,
    },
}

/// Apply the vocabulary policy: report category terms the vocabulary lacks
/// and, unless strict, scan for them too.
pub fn prepare_vocabulary(vocabulary: &Vocabulary, config: &PipelineConfig) -> Vocabulary {
    let missing = config.categories.check_coverage(vocabulary);
    let mut prepared = vocabulary.clone();

    if missing.is_empty() || config.strict_vocabulary {
        return prepared;
    }

    for term in &missing {
        prepared.push(term);
    }
    warn!(
        added = missing.len(),
        "Added missing category terms to the scanned vocabulary"
    );
    prepared
}

/// Run the whole pipeline and write both output tables under `paths`.
pub async fn run(
    index: &dyn FilingIndexService,
    extractor: &dyn SectionExtractor,
    vocabulary: &Vocabulary,
    config: &PipelineConfig,
    paths: &OutputPaths,
    cancel: &CancelFlag,
) -> Result<RunOutcome> {
    if vocabulary.is_empty() {
        anyhow::bail!("Keyword vocabulary is empty; nothing to scan for");
    }
    let vocabulary = prepare_vocabulary(vocabulary, config);

    let filings = fetch_filing_index(
        index,
        &config.form_type,
        config.start_year,
        config.end_year,
        config.request_timeout,
    )
    .await;

    if filings.is_empty() {
        info!("No filings found");
        return Ok(RunOutcome::NoFilings);
    }
    info!(count = filings.len(), "Filing index retrieved");

    let scanned = scan_filings(extractor, &vocabulary, config, filings, cancel).await;

    csv_out::write_raw_scan(&paths.raw_scan, &config.items, &scanned)?;
    info!(path = %paths.raw_scan.display(), "Raw keyword scan saved");

    let relevant = filter_relevant(&scanned, &config.categories);
    if relevant.is_empty() {
        return Ok(RunOutcome::NoRelevantFirms {
            scanned: scanned.len(),
        });
    }

    csv_out::write_relevant_firms(&paths.relevant_firms, &config.items, &relevant)?;
    info!(path = %paths.relevant_firms.display(), "Relevant firms saved");

    Ok(RunOutcome::Complete {
        scanned: scanned.len(),
        relevant,
    })
}
