//! Error types for the vinr-core library.
//!
//! Field extraction itself never fails: a field that cannot be found is left
//! empty. These errors cover the ambient surface (configuration, I/O) and the
//! typed parsing helpers.

use thiserror::Error;

/// Main error type for the vinr library.
#[derive(Error, Debug)]
pub enum VinrError {
    /// Invalid input passed to a typed helper.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by typed parsers such as [`crate::extract::rules::vin::Vin`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Cleaned VIN candidate has the wrong length.
    #[error("VIN must be 17 characters after cleaning, got {0}")]
    VinLength(usize),

    /// Cleaned VIN candidate contains a character outside the VIN alphabet.
    #[error("VIN contains disallowed character '{0}'")]
    VinCharacter(char),

    /// A year-month string could not be parsed.
    #[error("invalid year-month '{0}', expected YYYY-MM")]
    YearMonth(String),
}

/// Result type for the vinr library.
pub type Result<T> = std::result::Result<T, VinrError>;
