// Output: CSV tables for downstream consumers and terminal display.

pub mod csv;
pub mod terminal;

use std::path::{Path, PathBuf};

/// Suffix of the unfiltered stage-3 checkpoint table.
pub const RAW_SCAN_SUFFIX: &str = "_Raw_Keyword_Scan.csv";

/// Suffix of the final relevant-firms table.
pub const RELEVANT_FIRMS_SUFFIX: &str = "_Relevant_Firms.csv";

/// Where a run writes its two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub raw_scan: PathBuf,
    pub relevant_firms: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<prefix>_Raw_Keyword_Scan.csv` and `<dir>/<prefix>_Relevant_Firms.csv`.
    pub fn new(dir: &Path, prefix: &str) -> Self {
        Self {
            raw_scan: dir.join(format!("{prefix}{RAW_SCAN_SUFFIX}")),
            relevant_firms: dir.join(format!("{prefix}{RELEVANT_FIRMS_SUFFIX}")),
        }
    }
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing, this respects UTF-8 character boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
