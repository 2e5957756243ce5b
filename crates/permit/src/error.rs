//! Error types for token and structure operations

use thiserror::Error;

/// Errors raised by [`Token`](crate::Token) access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// A write was requested on a token that has other live handles.
    ///
    /// Recover by calling [`Token::duplicate`](crate::Token::duplicate)
    /// and writing to the private copy.
    #[error("Token is not writable: {ref_count} handles share it")]
    NotWritable {
        /// Number of handles alive at the time of the check
        ref_count: usize,
    },
}

/// Errors raised by [`Structure`](crate::Structure) field access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// The field exists but holds a value of a different type
    #[error("Field '{field}' has type {got}, expected {expected}")]
    TypeMismatch {
        /// Field name
        field: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Type actually stored
        got: &'static str,
    },

    /// The field holds an integer that does not fit the requested type
    #[error("Field '{field}' value {value} does not fit in {expected}")]
    OutOfRange {
        /// Field name
        field: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Stored value, rendered for the message
        value: String,
    },

    /// Field names must be non-empty
    #[error("Invalid field name: {0:?}")]
    InvalidFieldName(String),
}

/// Umbrella error for permit operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermitError {
    /// Token access error
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Structure access error
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Result type alias for permit operations
pub type Result<T> = std::result::Result<T, PermitError>;
