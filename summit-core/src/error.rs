//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum SummitError {
    /// Invalid experiment configuration, e.g. an unknown optimizer variant.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The state of the environment is no longer a finite vector.
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKey(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueType(String),
}
