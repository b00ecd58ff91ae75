//! CXSIM - User Behavior Similarity Search
//!
//! Loads a table of per-user service metrics and finds, for a target user,
//! the most similar other user and every user above a similarity threshold.
//! Similarity is cosine over the features both users actually observed.

pub mod engine;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod population;
pub mod table;

pub use engine::{similarity, EngineConfig, MatchResult, MatchSet, ScanReport, SimilarityEngine};
pub use error::{Error, FormatError, Result};
pub use generator::{Generator, GeneratorConfig, ServiceProfile};
pub use metrics::Metrics;
pub use population::{Entity, FeatureVector, Header, Population, MISSING};
pub use table::{load, load_path, TableConfig};
