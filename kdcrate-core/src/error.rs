//! Error types for kdcrate

use thiserror::Error;

/// Main error type for kdcrate operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Index out of range: point {index}, dimension {dim} (store holds {len} points)")]
    IndexOutOfRange {
        index: usize,
        dim: usize,
        len: usize,
    },

    #[error("Query issued against an empty index")]
    EmptyIndex,
}

/// Result type alias for kdcrate operations
pub type Result<T> = std::result::Result<T, Error>;
