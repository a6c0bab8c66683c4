//! Error types for the fluxroute engine.

use std::fmt;

/// Main error type for fluxroute operations
#[derive(Debug)]
pub enum Error {
    /// A node id, edge id, or range bound exceeds its container
    OutOfRange(String),

    /// Lower bound of a range operation is greater than the upper bound
    InvalidRange(String),

    /// Malformed graph description or rejected congestion factor
    InvalidInput(String),

    /// Unexpected condition at an engine boundary
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange(msg) => {
                write!(f, "out of range: {msg}")
            }
            Error::InvalidRange(msg) => {
                write!(f, "invalid range: {msg}")
            }
            Error::InvalidInput(msg) => {
                write!(f, "invalid input: {msg}")
            }
            Error::Internal(msg) => {
                write!(f, "internal error: {msg}")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Convenience result type for fluxroute operations
pub type Result<T> = std::result::Result<T, Error>;
