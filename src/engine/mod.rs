//! Engine Module
//!
//! Missing-value aware similarity and brute-force neighbor queries.

mod config;
mod query;
mod similarity;

pub use config::{EngineConfig, DEFAULT_THRESHOLD};
pub use query::{MatchResult, MatchSet, ScanReport, SimilarityEngine};
pub use similarity::{observed_overlap, similarity, similarity_unchecked, Overlap};
