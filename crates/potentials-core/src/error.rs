//! Error types for potentials-core

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::HttpError;
use potentials_bibtex::ParseError;

/// Result type alias for record operations
pub type Result<T> = std::result::Result<T, PotentialsError>;

/// Main error type for citation and potential records
#[derive(Error, Debug)]
pub enum PotentialsError {
    /// A stored model was supplied together with individual fields
    #[error("model cannot be given with any other parameter")]
    ConstructionConflict,

    /// BibTeX text was empty or malformed
    #[error("BibTeX parse error: {0}")]
    Parse(#[from] ParseError),

    /// Potential JSON was malformed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent from a record
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Every lookup tier failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// A loaded record is internally inconsistent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The stored id cannot be reproduced from the record contents
    #[error("Different ids: {computed} != {stored}")]
    IdMismatch { computed: String, stored: String },

    /// A record-version string is not an ISO date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP client could not be constructed
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}
