//! Error types for CSV reading, writing and dialect configuration

use thiserror::Error;

/// The error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum CsvError {
    /// A dialect change would break the distinct control character rule,
    /// clear the separator, or empty the line terminator
    #[error("Invalid dialect configuration: {0}")]
    Configuration(String),

    /// Malformed input that the parser cannot recover from on this call path
    #[error("Malformed CSV: {0}")]
    Format(String),

    /// Failure from the underlying character source or sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure opening or decoding an input file or archive
    #[error("Read error: {0}")]
    ReadError(String),

    /// Failure creating or finishing an output file or archive
    #[error("Write error: {0}")]
    WriteError(String),

    /// Operation attempted in a state that does not allow it (e.g. after close)
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// A convenience `Result` type alias using the crate's `CsvError` type.
pub type Result<T> = std::result::Result<T, CsvError>;
