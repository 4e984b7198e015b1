// Filing index retrieval with per-year pagination.
//
// Years are queried independently. Within a year we page with a fixed page
// size until a page comes back empty or the offset ceiling is reached. A
// failed page ends that year only: what was already fetched is kept, the
// remaining years still run, and nothing is retried.

use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::edgar::traits::{FilingIndexService, FilingQuery};
use crate::models::FilingIndexRecord;

/// Results requested per page.
pub const PAGE_SIZE: u32 = 200;

/// Offsets stop strictly below this value, capping queries per year.
pub const MAX_OFFSET: u32 = 10_000;

/// Fetch every filing of `form_type` filed in `start_year..=end_year`.
///
/// Output is ordered by year, then by filing date within each year. Filings
/// are not de-duplicated.
pub async fn fetch_filing_index(
    service: &dyn FilingIndexService,
    form_type: &str,
    start_year: i32,
    end_year: i32,
    timeout: Duration,
) -> Vec<FilingIndexRecord> {
    let mut index = Vec::new();

    for year in start_year..=end_year {
        let batch = fetch_year(service, form_type, year, timeout).await;
        info!(year, count = batch.len(), "Retrieved filing index for year");
        index.extend(batch);
    }

    index
}

async fn fetch_year(
    service: &dyn FilingIndexService,
    form_type: &str,
    year: i32,
    timeout: Duration,
) -> Vec<FilingIndexRecord> {
    let mut batch = Vec::new();

    for from in (0..MAX_OFFSET).step_by(PAGE_SIZE as usize) {
        let query = FilingQuery {
            form_type: form_type.to_string(),
            year,
            from,
            size: PAGE_SIZE,
        };

        let page = match tokio::time::timeout(timeout, service.fetch_page(&query)).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!(year, from, error = %e, "Failed to fetch filing page, stopping this year");
                break;
            }
            Err(_) => {
                warn!(year, from, "Filing page request timed out, stopping this year");
                break;
            }
        };

        if page.is_empty() {
            break;
        }

        debug!(year, from, page_size = page.len(), "Fetched page of filings");
        batch.extend(page.into_iter().map(|m| m.into_record()));
    }

    // The service sorts by filing time already; keep that guaranteed here.
    // Records without a date keep their relative order at the end.
    batch.sort_by_key(|r| (r.file_date.is_none(), r.file_date));
    batch
}
