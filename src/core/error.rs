/*!
# Unified Error Type

This module provides the unified error enum for all Thorup engine
operations, consolidating input validation, preparation-state, and internal
invariant failures for consistent error handling and pattern matching.
*/

use std::error::Error;
use std::fmt;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ThorupError>;

/// Unified error type for all operations of the crate.
///
/// The variants mirror the failure taxonomy of the engine: malformed
/// inputs, bad call arguments, queries against an unprepared engine,
/// duplicate edges, and internal invariant violations (which are bugs,
/// not recoverable conditions).
#[derive(Debug)]
pub enum ThorupError {
    /// Malformed DIMACS input, out-of-range vertex, non-positive edge
    /// weight, or a zero-vertex graph
    InvalidInput(String),

    /// Source vertex outside `[0, n)`, decrease-cost to infinity, or a
    /// negative new cost
    InvalidArgument(String),

    /// Query issued before both preparation steps succeeded
    NotPrepared(String),

    /// Duplicate edge between an already-connected vertex pair
    ParallelEdge(String),

    /// A structural invariant of the component tree or the split-findmin
    /// structure was violated; aborts the query and indicates a bug
    InternalInvariantViolation(String),

    /// I/O error while reading or writing graph files
    IoError(String),
}

impl ThorupError {
    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ThorupError::InvalidInput(message.into())
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ThorupError::InvalidArgument(message.into())
    }

    /// Creates a not-prepared error.
    pub fn not_prepared(message: impl Into<String>) -> Self {
        ThorupError::NotPrepared(message.into())
    }

    /// Creates a parallel edge error.
    pub fn parallel_edge(message: impl Into<String>) -> Self {
        ThorupError::ParallelEdge(message.into())
    }

    /// Creates an internal invariant violation error.
    pub fn internal(message: impl Into<String>) -> Self {
        ThorupError::InternalInvariantViolation(message.into())
    }
}

impl fmt::Display for ThorupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ThorupError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ThorupError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ThorupError::NotPrepared(msg) => write!(f, "Engine not prepared: {}", msg),
            ThorupError::ParallelEdge(msg) => write!(f, "Parallel edge: {}", msg),
            ThorupError::InternalInvariantViolation(msg) => {
                write!(f, "Internal invariant violation: {}", msg)
            }
            ThorupError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl Error for ThorupError {}

impl From<std::io::Error> for ThorupError {
    fn from(e: std::io::Error) -> Self {
        ThorupError::IoError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ThorupError::invalid_input("vertex 7 out of range");
        assert_eq!(format!("{}", err), "Invalid input: vertex 7 out of range");

        let err = ThorupError::not_prepared("missing component tree");
        assert_eq!(
            format!("{}", err),
            "Engine not prepared: missing component tree"
        );

        let err = ThorupError::parallel_edge("edge (1, 2) already present");
        assert_eq!(
            format!("{}", err),
            "Parallel edge: edge (1, 2) already present"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.gr");
        let err: ThorupError = io_err.into();
        assert!(matches!(err, ThorupError::IoError(_)));
    }
}
