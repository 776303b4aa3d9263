//! Error types for row sources.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading shipment rows.
///
/// All of these abort the run; nothing is aggregated from a partial read.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV reader rejected the input.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document or line could not be parsed.
    #[error("JSON error on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A configured column is not present in the input.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// The input parsed but does not have the expected structure.
    #[error("unexpected input shape: {0}")]
    InvalidShape(String),
}
