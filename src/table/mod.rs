//! Table Module
//!
//! Delimited text tables of identifiers and feature vectors.

mod reader;
mod writer;

pub use reader::{load, load_path};
pub use writer::{save_path, write};

use std::path::PathBuf;

/// Default table location shared by the generator and the query tool
pub const DEFAULT_DATA_PATH: &str = "user_behavior_vectors.csv";

/// Table format configuration
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Field delimiter
    pub delimiter: char,
    /// Token meaning "no observation", matched after trimming
    pub missing_token: String,
    /// Decimal places used when writing values
    pub precision: usize,
    /// Table path used by the binaries
    pub path: PathBuf,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            missing_token: "-1".to_string(),
            precision: 4,
            path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl TableConfig {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_missing_token(mut self, token: impl Into<String>) -> Self {
        self.missing_token = token.into();
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }
}
