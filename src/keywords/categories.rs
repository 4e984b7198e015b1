// The three hand-curated category sets behind the relevance decision.
//
// These are separate from the scanned vocabulary. The relevance filter only
// ever sees keyword-count maps, so a category term that was never scanned can
// never be found. `check_coverage` surfaces that at startup.

use tracing::warn;

use super::vocabulary::Vocabulary;

pub const TARIFF_KEYWORDS: &[&str] = &["tariff", "tariffs", "duty", "duties"];
pub const POLICY_KEYWORDS: &[&str] = &["trade war", "section 301", "trade policy"];
pub const EXEMPTION_KEYWORDS: &[&str] =
    &["exemption", "exemptions", "waiver", "relief", "exclusion"];

/// Which of the three categories a filing matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryMatch {
    pub tariff: bool,
    pub policy: bool,
    pub exemption: bool,
}

impl CategoryMatch {
    /// Relevant only when every category matched.
    pub fn is_relevant(&self) -> bool {
        self.tariff && self.policy && self.exemption
    }
}

/// The tariff, trade-policy and exemption term groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySets {
    pub tariff: Vec<String>,
    pub policy: Vec<String>,
    pub exemption: Vec<String>,
}

impl Default for CategorySets {
    fn default() -> Self {
        Self::new(TARIFF_KEYWORDS, POLICY_KEYWORDS, EXEMPTION_KEYWORDS)
    }
}

impl CategorySets {
    pub fn new(tariff: &[&str], policy: &[&str], exemption: &[&str]) -> Self {
        let owned = |terms: &[&str]| -> Vec<String> {
            terms.iter().map(|t| t.to_lowercase()).collect()
        };
        Self {
            tariff: owned(tariff),
            policy: owned(policy),
            exemption: owned(exemption),
        }
    }

    /// Every term across the three sets, in set order.
    pub fn all_terms(&self) -> impl Iterator<Item = &str> {
        self.tariff
            .iter()
            .chain(&self.policy)
            .chain(&self.exemption)
            .map(String::as_str)
    }

    /// Test each category independently against an already-lowercased blob.
    pub fn match_blob(&self, blob: &str) -> CategoryMatch {
        CategoryMatch {
            tariff: any_in(blob, &self.tariff),
            policy: any_in(blob, &self.policy),
            exemption: any_in(blob, &self.exemption),
        }
    }

    /// Warn about every category term the vocabulary doesn't scan for.
    /// Returns the missing terms.
    pub fn check_coverage<'a>(&'a self, vocabulary: &Vocabulary) -> Vec<&'a str> {
        let missing = vocabulary.missing(self.all_terms());
        for term in &missing {
            warn!(
                term = *term,
                "Category term is not in the keyword vocabulary and can never match"
            );
        }
        missing
    }
}

fn any_in(blob: &str, terms: &[String]) -> bool {
    terms.iter().any(|t| blob.contains(t.as_str()))
}
