// Data model shared by every pipeline stage.
//
// Records widen as they move through the pipeline: a FilingIndexRecord from
// the retriever becomes an EnrichedFilingRecord once its sections are
// extracted and scored, and a RelevantFirmRecord (text dropped) if it passes
// the category filter.

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Sparse keyword -> occurrence count map. Only keywords seen at least once
/// are present; an empty map means nothing matched.
pub type KeywordCounts = BTreeMap<String, u32>;

/// Per-item keyword counts for one filing, in configured item order.
pub type ItemKeywordCounts = Vec<(String, KeywordCounts)>;

/// One filing as listed by the filing-metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingIndexRecord {
    pub cik: String,
    pub file_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    pub company_name: String,
    /// Link to the filing document. This is the filing's identity.
    pub filing_url: String,
    /// Standard Industrial Classification code.
    pub sic: String,
}

/// A single analyzed item of a filing: its normalized text and keyword counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSection {
    pub item: String,
    pub text: String,
    pub counts: KeywordCounts,
}

/// A filing widened with one analyzed section per configured item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedFilingRecord {
    pub filing: FilingIndexRecord,
    pub sections: Vec<ItemSection>,
}

impl EnrichedFilingRecord {
    /// Keyword counts for a single item, if the item was analyzed.
    pub fn counts_for(&self, item: &str) -> Option<&KeywordCounts> {
        self.sections
            .iter()
            .find(|s| s.item.eq_ignore_ascii_case(item))
            .map(|s| &s.counts)
    }

    /// The per-item counts without the section text.
    pub fn item_counts(&self) -> ItemKeywordCounts {
        self.sections
            .iter()
            .map(|s| (s.item.clone(), s.counts.clone()))
            .collect()
    }
}

/// A filing that passed the three-category test. Carries no section text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantFirmRecord {
    pub filing: FilingIndexRecord,
    pub item_counts: ItemKeywordCounts,
}

impl From<&EnrichedFilingRecord> for RelevantFirmRecord {
    fn from(record: &EnrichedFilingRecord) -> Self {
        Self {
            filing: record.filing.clone(),
            item_counts: record.item_counts(),
        }
    }
}

/// Render a count map in its stable textual encoding (JSON, sorted keys).
///
/// An empty map renders as `{}`.
pub fn render_counts(counts: &KeywordCounts) -> String {
    serde_json::to_string(counts).unwrap_or_else(|_| "{}".to_string())
}

/// Parse a count map previously produced by [`render_counts`].
///
/// Blank input is treated as an empty map.
pub fn parse_counts(raw: &str) -> anyhow::Result<KeywordCounts> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(KeywordCounts::new());
    }
    Ok(serde_json::from_str(raw)?)
}

/// Remove repeated filings (same `filing_url`), keeping the first occurrence.
///
/// The retriever never deduplicates on its own; callers that want unique
/// filings opt in here.
pub fn dedup_by_filing_url(records: &mut Vec<FilingIndexRecord>) {
    let mut seen = std::collections::HashSet::new();
    records.retain(|r| seen.insert(r.filing_url.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filing(cik: &str, url: &str) -> FilingIndexRecord {
        FilingIndexRecord {
            cik: cik.to_string(),
            file_date: None,
            report_date: None,
            company_name: "Acme Corp".to_string(),
            filing_url: url.to_string(),
            sic: "3711".to_string(),
        }
    }

    #[test]
    fn test_render_empty_counts() {
        assert_eq!(render_counts(&KeywordCounts::new()), "{}");
    }

    #[test]
    fn test_render_counts_sorted_keys() {
        let counts: KeywordCounts = [("waiver".to_string(), 1), ("tariff".to_string(), 3)].into();
        assert_eq!(render_counts(&counts), r#"{"tariff":3,"waiver":1}"#);
    }

    #[test]
    fn test_parse_counts_reads_rendered_map() {
        let counts: KeywordCounts = [("trade war".to_string(), 2)].into();
        assert_eq!(parse_counts(&render_counts(&counts)).unwrap(), counts);
        assert!(parse_counts("  ").unwrap().is_empty());
        assert!(parse_counts("not json").is_err());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut records = vec![filing("1", "a"), filing("2", "b"), filing("3", "a")];
        dedup_by_filing_url(&mut records);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cik, "1");
        assert_eq!(records[1].filing_url, "b");
    }

    #[test]
    fn test_counts_for_is_case_insensitive() {
        let record = EnrichedFilingRecord {
            filing: filing("1", "a"),
            sections: vec![ItemSection {
                item: "1A".to_string(),
                text: String::new(),
                counts: [("duty".to_string(), 1)].into(),
            }],
        };
        assert_eq!(record.counts_for("1a").unwrap()["duty"], 1);
        assert!(record.counts_for("7").is_none());
    }
}
