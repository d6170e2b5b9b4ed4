//! Error types for the Trionic log parser library.

use std::fmt;

/// Result type alias for log conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading a log or writing CSV output.
///
/// Ingestion itself never fails: malformed lines are skipped and an input
/// with no recognizable date format yields an empty log. The variants here
/// cover the file-handle boundary around the core.
#[derive(Debug)]
pub enum Error {
    /// I/O error occurred while reading the log or writing the CSV
    Io(std::io::Error),

    /// Input bytes were not valid UTF-8
    Utf8Error(std::string::FromUtf8Error),

    /// Output error (e.g. the CSV destination cannot be opened)
    OutputError(String),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Utf8Error(err) => write!(f, "UTF-8 error: {}", err),
            Error::OutputError(msg) => write!(f, "Output error: {}", msg),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Utf8Error(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Error::Utf8Error(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
