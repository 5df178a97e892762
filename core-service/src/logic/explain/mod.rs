//! Explain Module - per-transaction feature contributions
//!
//! - `fetcher` - backend request with canned fallback
//! - `engine` - payload normalization and display helpers

pub mod engine;
pub mod fetcher;
pub mod types;


pub use engine::{humanize_feature, summarize, top_contribution};
pub use fetcher::ExplainFetcher;
pub use types::{Explanation, FeatureContribution};
