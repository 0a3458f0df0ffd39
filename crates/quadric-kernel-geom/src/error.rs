//! Error types for surface construction.

use thiserror::Error;

/// Errors that can occur while building a surface from a specification.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Specification string has no keyword.
    #[error("empty surface specification")]
    Empty,

    /// Keyword not understood by the surface being configured.
    #[error("unknown {variant} keyword '{keyword}'")]
    UnknownKeyword {
        /// Surface class that rejected the keyword.
        variant: &'static str,
        /// The offending keyword.
        keyword: String,
    },

    /// Wrong number of numeric parameters for the keyword.
    #[error("'{keyword}' expects {expected} numeric parameters, found {found}")]
    WrongArity {
        /// Keyword being parsed.
        keyword: String,
        /// Accepted parameter counts.
        expected: &'static str,
        /// Number of parameters supplied.
        found: usize,
    },

    /// Token that should have been a number.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    /// Parameters parse but describe no valid surface.
    #[error("degenerate surface: {0}")]
    Degenerate(String),
}

impl GeomError {
    /// Create an unknown keyword error.
    pub fn unknown(variant: &'static str, keyword: impl Into<String>) -> Self {
        Self::UnknownKeyword {
            variant,
            keyword: keyword.into(),
        }
    }

    /// Create a wrong arity error.
    pub fn arity(keyword: impl Into<String>, expected: &'static str, found: usize) -> Self {
        Self::WrongArity {
            keyword: keyword.into(),
            expected,
            found,
        }
    }
}

/// Result type for surface operations.
pub type Result<T> = std::result::Result<T, GeomError>;
