// EDGAR data access: filing index queries and section text extraction.
//
// The traits in `traits` are the seams the pipeline depends on. The sec-api.io
// clients implement them for production; tests swap in in-memory fakes.

pub mod extractor;
pub mod query;
pub mod rate_limiter;
pub mod traits;
