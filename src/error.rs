//! Error types for the navigation indexer.
//!
//! Structured error types using thiserror, with per-subsystem Result
//! aliases. Not-found lookups are deliberately not represented here:
//! absence is an expected outcome of navigation queries and surfaces as
//! `Option`/empty collections in the query layer.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for indexing operations
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse C++ file '{path}': {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to initialize C++ parser: {reason}")]
    ParserInit { reason: String },
}

/// Errors specific to index store load/save
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{path}' is not an index store (bad magic)")]
    BadMagic { path: PathBuf },

    #[error("Unsupported store format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Index store is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("Store schema mismatch: {reason}")]
    SchemaMismatch { reason: String },
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_messages_name_the_file() {
        let err = IndexError::Parse {
            path: PathBuf::from("src/broken.cc"),
            reason: "parser returned no tree".to_string(),
        };
        assert!(err.to_string().contains("src/broken.cc"));

        let err = IndexError::FileRead {
            path: PathBuf::from("missing.cc"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing.cc"));
    }

    #[test]
    fn test_storage_error_messages_carry_context() {
        let err = StorageError::UnsupportedVersion {
            found: 9,
            expected: 1,
        };
        assert!(err.to_string().contains('9'));

        let err = StorageError::SchemaMismatch {
            reason: "table 'refs' has arity 5".to_string(),
        };
        assert!(err.to_string().contains("arity 5"));
    }
}
