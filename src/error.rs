//! Error Types
//!
//! Typed failures for table loading and similarity queries.

use std::io;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed input table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Source had no rows at all
    #[error("missing header row")]
    MissingHeader,

    /// First row was blank or has a blank identifier column
    #[error("header row is empty")]
    EmptyHeader,

    /// Line is not valid UTF-8
    #[error("line {line}: invalid UTF-8")]
    InvalidEncoding { line: usize },

    /// Data row width differs from the header
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Feature token is neither the missing token nor a finite float
    #[error("line {line}, column {column}: invalid number {token:?}")]
    InvalidNumber {
        line: usize,
        column: String,
        token: String,
    },
}

/// Error type for cxsim
#[derive(Error, Debug)]
pub enum Error {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Two vectors of unequal length were compared
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Neighbor queries need at least one non-target entity
    #[error("insufficient data: {entities} entities, need at least 2")]
    InsufficientData { entities: usize },

    #[error("target index {index} out of range for {entities} entities")]
    TargetOutOfRange { index: usize, entities: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A sharded scan worker panicked
    #[error("scan worker panicked")]
    ScanWorker,
}

impl Error {
    /// Whether this error came from a malformed table
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}
