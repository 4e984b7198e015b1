// Per-filing section extraction.
//
// Each configured item is requested on its own. A failed or timed-out item
// becomes an empty string; it never affects sibling items or other filings.

use tokio::time::Duration;
use tracing::warn;

use crate::edgar::traits::SectionExtractor;

use super::normalize::normalize;

/// Extract and normalize every item of one filing, in `items` order.
///
/// Returns `(item, text)` pairs; items that failed have empty text.
pub async fn extract_sections(
    extractor: &dyn SectionExtractor,
    filing_url: &str,
    items: &[String],
    timeout: Duration,
) -> Vec<(String, String)> {
    let mut sections = Vec::with_capacity(items.len());

    for item in items {
        let text =
            match tokio::time::timeout(timeout, extractor.extract_section(filing_url, item)).await
            {
                Ok(Ok(raw)) if raw.is_empty() => String::new(),
                Ok(Ok(raw)) => normalize(&raw),
                Ok(Err(e)) => {
                    warn!(filing_url, item = item.as_str(), error = %e, "Section extraction failed");
                    String::new()
                }
                Err(_) => {
                    warn!(filing_url, item = item.as_str(), "Section extraction timed out");
                    String::new()
                }
            };
        sections.push((item.clone(), text));
    }

    sections
}
