use std::path::PathBuf;

use thiserror::Error;

/// Main error type for Musictree
#[derive(Error, Debug)]
pub enum MusictreeError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walking errors
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization errors, used for the mention list column
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Export dump could not be deserialized
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// One article could not be turned into a record. Recoverable: the
    /// article is skipped and the batch continues.
    #[error("Malformed record in {}: {reason}", source_path.display())]
    MalformedRecord { source_path: PathBuf, reason: String },

    /// Two records share a name; the known-artist index would be ambiguous
    #[error("Duplicate artist name: {0}")]
    DuplicateArtistName(String),

    /// Traversal root is not an artist of the matrix
    #[error("Root artist not found in matrix: {0}")]
    RootNotFound(String),

    /// Traversal depth below zero
    #[error("Invalid depth: {0} (must be 0 or more)")]
    InvalidDepth(i64),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using MusictreeError
pub type Result<T> = std::result::Result<T, MusictreeError>;
