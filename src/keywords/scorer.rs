// Sparse keyword scoring.
//
// Counts case-insensitive, non-overlapping substring occurrences of each
// vocabulary keyword. This is deliberately not word-boundary matching:
// "tariff" is counted inside "tariffs".

use crate::models::KeywordCounts;

use super::vocabulary::Vocabulary;

/// Count vocabulary keywords in `text`, omitting keywords that never occur.
pub fn score(text: &str, vocabulary: &Vocabulary) -> KeywordCounts {
    let mut counts = KeywordCounts::new();
    if text.is_empty() {
        return counts;
    }

    let lowered = text.to_lowercase();
    for keyword in vocabulary.iter() {
        let n = lowered.matches(keyword.lowered.as_str()).count() as u32;
        if n > 0 {
            counts.insert(keyword.term.clone(), n);
        }
    }
    counts
}
