//! Unified error types for the gridsec crates
//!
//! [`GridsecError`] covers the failures the contingency core can surface:
//! unresolved equipment, anchors that do not match an equipment side,
//! rejected limit reductions, invalid criteria and inconsistent networks.
//! Loading rule files is handled with `anyhow` contexts in `gridsec-algo`.
//!
//! # Example
//!
//! ```ignore
//! use gridsec_core::{GridsecError, GridsecResult};
//!
//! fn trip_line(network: &Network, id: &str) -> GridsecResult<TrippingResult> {
//!     let line = network
//!         .equipment(id)
//!         .ok_or_else(|| GridsecError::not_found("Line", id))?;
//!     ...
//! }
//! ```

use thiserror::Error;

/// Unified error type for all gridsec operations.
#[derive(Error, Debug)]
pub enum GridsecError {
    /// An identifier did not resolve to an element of the expected kind
    #[error("{kind} '{id}' not found")]
    NotFound { kind: String, id: String },

    /// An anchor (side, voltage level, DC node) is not one of the element's connections
    #[error("{kind} '{id}' is not connected to {anchor}")]
    NotConnected {
        kind: String,
        id: String,
        anchor: String,
    },

    /// A limit reduction was rejected at construction time
    #[error("Invalid limit reduction: {0}")]
    InvalidReduction(String),

    /// I/O errors (rule definition files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network structure errors
    #[error("Network error: {0}")]
    Network(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

impl GridsecError {
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        GridsecError::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn not_connected(
        kind: impl Into<String>,
        id: impl Into<String>,
        anchor: impl Into<String>,
    ) -> Self {
        GridsecError::NotConnected {
            kind: kind.into(),
            id: id.into(),
            anchor: anchor.into(),
        }
    }
}

/// Convenience type alias for Results using GridsecError.
pub type GridsecResult<T> = Result<T, GridsecError>;

impl From<String> for GridsecError {
    fn from(s: String) -> Self {
        GridsecError::Other(s)
    }
}

impl From<&str> for GridsecError {
    fn from(s: &str) -> Self {
        GridsecError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = GridsecError::not_found("Line", "NHV1_NHV2_1");
        assert_eq!(err.to_string(), "Line 'NHV1_NHV2_1' not found");
    }

    #[test]
    fn test_not_connected_display() {
        let err = GridsecError::not_connected("Line", "L1", "voltage level 'VL9'");
        assert!(err.to_string().contains("not connected to voltage level 'VL9'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GridsecError = io_err.into();
        assert!(matches!(err, GridsecError::Io(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> GridsecResult<()> {
            Err(GridsecError::InvalidReduction("factor 1.5".into()))
        }

        fn outer() -> GridsecResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(GridsecError::InvalidReduction(_))));
    }
}
