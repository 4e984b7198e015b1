// Stage 4: the three-category relevance filter.
//
// For each filing, every item's count map is rendered in its stable textual
// form, lowercased and concatenated into one blob. The filing is relevant
// when the blob contains at least one tariff term, one trade-policy term and
// one exemption term. Only scanned keywords ever show up in the blob, so the
// vocabulary must cover the category sets for this to find anything.

use tracing::info;

use crate::keywords::categories::{CategoryMatch, CategorySets};
use crate::models::{
    render_counts, EnrichedFilingRecord, KeywordCounts, RelevantFirmRecord,
};

/// Concatenate the lowercased rendering of each item's count map.
pub fn aggregate_blob<'a, I>(item_counts: I) -> String
where
    I: IntoIterator<Item = &'a KeywordCounts>,
{
    item_counts
        .into_iter()
        .map(|counts| render_counts(counts).to_lowercase())
        .collect()
}

/// Category test for one filing.
pub fn classify(record: &EnrichedFilingRecord, categories: &CategorySets) -> CategoryMatch {
    let blob = aggregate_blob(record.sections.iter().map(|s| &s.counts));
    categories.match_blob(&blob)
}

/// Keep the relevant filings, sorted by firm identifier, without section text.
pub fn filter_relevant(
    records: &[EnrichedFilingRecord],
    categories: &CategorySets,
) -> Vec<RelevantFirmRecord> {
    let mut relevant: Vec<RelevantFirmRecord> = records
        .iter()
        .filter(|r| classify(r, categories).is_relevant())
        .map(RelevantFirmRecord::from)
        .collect();

    // CIKs are identifiers, not numbers: "1000" sorts before "999".
    relevant.sort_by(|a, b| a.filing.cik.cmp(&b.filing.cik));

    info!(
        scanned = records.len(),
        relevant = relevant.len(),
        "Relevance filter complete"
    );

    relevant
}
