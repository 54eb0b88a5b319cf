//! Error types for the spelltrie library.
//!
//! All fallible operations return [`SpellError`]. Most of them happen while
//! building a corrector (loading data, training, calibrating); correcting a
//! query never fails and degrades to returning the query unchanged.
//!
//! # Examples
//!
//! ```
//! use spelltrie::error::{Result, SpellError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SpellError::invalid_config("branch ratio must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for spelltrie operations.
#[derive(Error, Debug)]
pub enum SpellError {
    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing or writing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dictionary-related errors (empty dictionary, bad frequencies)
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Training-related errors (bad weights, malformed pairs)
    #[error("Training error: {0}")]
    Training(String),

    /// Acceptance threshold could not be calibrated
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// A word contains reserved boundary characters
    #[error("Invalid word: {0}")]
    InvalidWord(String),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SpellError.
pub type Result<T> = std::result::Result<T, SpellError>;

impl SpellError {
    /// Create a new dictionary error.
    pub fn dictionary<S: Into<String>>(msg: S) -> Self {
        SpellError::Dictionary(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        SpellError::Training(msg.into())
    }

    /// Create a new calibration error.
    pub fn calibration<S: Into<String>>(msg: S) -> Self {
        SpellError::Calibration(msg.into())
    }

    /// Create a new invalid word error.
    pub fn invalid_word<S: Into<String>>(msg: S) -> Self {
        SpellError::InvalidWord(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SpellError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SpellError::Other(msg.into())
    }
}
