// Keyword vocabulary loaded from a CSV file with a `keyword` column.
//
// The vocabulary is loaded once and stays fixed for the life of a run.
// Failing to load it is fatal: without keywords every scan would be vacuous.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Name of the CSV column holding the keywords.
pub const KEYWORD_COLUMN: &str = "keyword";

/// A single vocabulary entry, with its lowercase form precomputed for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    pub term: String,
    pub lowered: String,
}

/// The ordered, de-duplicated set of keywords scanned in every section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    keywords: Vec<Keyword>,
}

impl Vocabulary {
    /// Build a vocabulary from raw terms. Terms are trimmed; blanks and exact
    /// duplicates are dropped. Spellings that differ only in case are kept
    /// as separate keywords, each with its own count.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::default();
        for term in terms {
            vocab.push(term.as_ref());
        }
        vocab
    }

    /// Load the vocabulary from a CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Keyword file not found at '{}'", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header of '{}'", path.display()))?
            .clone();

        let column = headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == KEYWORD_COLUMN)
            .with_context(|| {
                format!(
                    "Keyword file '{}' has no `{KEYWORD_COLUMN}` column",
                    path.display()
                )
            })?;

        let mut terms = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("Failed to parse '{}'", path.display()))?;
            if let Some(term) = record.get(column) {
                terms.push(term.to_string());
            }
        }

        let vocab = Self::from_terms(terms);
        if vocab.is_empty() {
            anyhow::bail!("Keyword file '{}' contains no keywords", path.display());
        }

        info!(
            count = vocab.len(),
            path = %path.display(),
            "Loaded keyword vocabulary"
        );
        Ok(vocab)
    }

    /// Add a term unless it's blank or already present with the same
    /// spelling. Returns true if added.
    pub fn push(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() || self.keywords.iter().any(|k| k.term == term) {
            return false;
        }
        self.keywords.push(Keyword {
            term: term.to_string(),
            lowered: term.to_lowercase(),
        });
        true
    }

    /// Whether the vocabulary contains `term` (case-insensitive).
    pub fn contains(&self, term: &str) -> bool {
        let lowered = term.trim().to_lowercase();
        self.keywords.iter().any(|k| k.lowered == lowered)
    }

    /// The terms from `terms` that are not in the vocabulary, de-duplicated,
    /// in input order.
    pub fn missing<'a, I>(&self, terms: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        terms
            .into_iter()
            .filter(|t| !self.contains(t) && seen.insert(t.to_lowercase()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_terms_trims_and_dedups() {
        let vocab = Vocabulary::from_terms([" Tariff ", "tariff", "", "duty", "duty "]);
        let terms: Vec<&str> = vocab.iter().map(|k| k.term.as_str()).collect();
        assert_eq!(terms, vec!["Tariff", "tariff", "duty"]);
        assert_eq!(vocab.iter().next().unwrap().lowered, "tariff");
    }

    #[test]
    fn test_load_reads_keyword_column() {
        let file = write_csv("id,keyword\n1,tariff\n2,trade war\n3,\n");
        let vocab = Vocabulary::load(file.path()).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("Trade War"));
    }

    #[test]
    fn test_load_tolerates_byte_order_mark() {
        let file = write_csv("\u{feff}keyword\nwaiver\n");
        let vocab = Vocabulary::load(file.path()).unwrap();
        assert!(vocab.contains("waiver"));
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let err = Vocabulary::load(Path::new("/nonexistent/keywords.csv")).unwrap_err();
        assert!(err.to_string().contains("Keyword file not found"));
    }

    #[test]
    fn test_load_missing_column_is_error() {
        let file = write_csv("term\ntariff\n");
        assert!(Vocabulary::load(file.path()).is_err());
    }

    #[test]
    fn test_load_empty_vocabulary_is_error() {
        let file = write_csv("keyword\n\n");
        assert!(Vocabulary::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_terms() {
        let vocab = Vocabulary::from_terms(["tariff", "waiver"]);
        let missing = vocab.missing(["tariff", "duty", "Duty", "waiver", "relief"]);
        assert_eq!(missing, vec!["duty", "relief"]);
    }
}
