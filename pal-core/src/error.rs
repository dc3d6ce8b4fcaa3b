//! Structured error types for the pal crates.

use thiserror::Error;

/// Unified error type for all alignment operations.
#[derive(Debug, Error)]
pub enum PalError {
    /// I/O error (file not found, permission denied, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error (malformed score table)
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid input (bad arguments, out-of-range values)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A residue pair was scored where at least one residue lies outside the alphabet.
    #[error("unknown residue in pair ({0:?}, {1:?})")]
    UnknownResidue(char, char),

    /// The aligned query and subject buffers differ in length.
    #[error("aligned sequences differ in length: query {query}, subject {subject}")]
    UnequalLength { query: usize, subject: usize },
}

/// Convenience alias used throughout the pal crates.
pub type Result<T> = std::result::Result<T, PalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PalError = io.into();
        assert!(matches!(err, PalError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn messages_name_the_offender() {
        let err = PalError::UnknownResidue('A', '@');
        assert_eq!(err.to_string(), "unknown residue in pair ('A', '@')");

        let err = PalError::UnequalLength { query: 3, subject: 4 };
        assert_eq!(
            err.to_string(),
            "aligned sequences differ in length: query 3, subject 4"
        );
    }
}
