//! # Error Types
//!
//! Structured error types for flange_core.
//!
//! The calculation engine itself never fails: unknown table keys fall back to
//! the first entry and degenerate denominators are replaced. Errors only come
//! from the edges of the crate: building a reference table snapshot, reading
//! or writing design/table files, and rejecting an unusable optimizer grid.
//!
//! ## Example
//!
//! ```rust
//! use flange_core::errors::{CalcError, CalcResult};
//!
//! fn check_count(bolt_count: u32) -> CalcResult<()> {
//!     if bolt_count % 4 != 0 {
//!         return Err(CalcError::invalid_input(
//!             "bolt_count",
//!             bolt_count.to_string(),
//!             "Bolt count must be a multiple of 4",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for flange_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for table and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A reference table violates one of its snapshot invariants
    #[error("Invalid reference table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidTable error
    pub fn invalid_table(table: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidTable {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidTable { .. } => "INVALID_TABLE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_table("bolt_specs", "duplicate size 3/4");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidTable\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::invalid_input("x", "1", "bad").error_code(), "INVALID_INPUT");
        assert_eq!(CalcError::invalid_table("rings", "empty").error_code(), "INVALID_TABLE");
        assert_eq!(
            CalcError::file_error("open", "a.json", "missing").error_code(),
            "FILE_ERROR"
        );
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<f64>("not a number").unwrap_err();
        let calc: CalcError = err.into();
        assert_eq!(calc.error_code(), "SERIALIZATION_ERROR");
    }
}
