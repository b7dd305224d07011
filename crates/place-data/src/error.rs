//! Error types for the place-data crate.
//!
//! Covers fixture loading (files, JSON) and preference-profile validation.

use thiserror::Error;

/// Errors that can occur while loading place data or validating a profile
#[derive(Error, Debug)]
pub enum DataError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File contents were not the JSON shape we expect
    #[error("JSON error in {file}: {source}")]
    JsonError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A textual value could not be mapped onto a domain enum
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A required profile field was absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A numeric field fell outside its allowed range
    #[error("{field} out of range: {value} (expected {expected})")]
    OutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// Two places in one fixture share an id
    #[error("Duplicate place id: {0}")]
    DuplicatePlace(String),

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataError>;
