//! Error types for yamlpack operations.

use thiserror::Error;

/// Result type alias for yamlpack operations
pub type Result<T> = std::result::Result<T, YamlpackError>;

/// Core error type for yamlpack operations
#[derive(Error, Debug)]
pub enum YamlpackError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document text or a structure the model cannot represent
    #[error("Parse error: {0}")]
    Parse(String),

    /// Corrupted or foreign packed-array data
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Value does not fit the packed representation
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
