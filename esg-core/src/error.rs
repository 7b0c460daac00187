//! Common error types for the ESG console

use thiserror::Error;

/// Common result type for ESG console operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the console crates
///
/// Benign signals are not errors: a duplicate assignment creation returns
/// `None` and a not-found removal returns `false`. Only structural failures
/// (unreadable files, rejected imports, bad configuration) surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// CSV import rejected before any row was processed
    #[error("CSV import error: {0}")]
    CsvImport(String),
}
