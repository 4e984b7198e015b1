// filingscan: find firms whose annual filings discuss tariffs, trade policy
// and tariff exemptions together.
//
// This is the library root. Each module corresponds to a stage or a
// collaborator of the filing scan pipeline.

pub mod config;
pub mod edgar;
pub mod keywords;
pub mod models;
pub mod output;
pub mod pipeline;
