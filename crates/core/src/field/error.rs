//! Error types for field path handling.

use thiserror::Error;

/// Errors that can occur while parsing or writing a field path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The path string was empty.
    #[error("Field path is empty")]
    EmptyPath,

    /// The path string could not be parsed.
    #[error("Malformed field path '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// A write indexed further past the end of an array than padding allows.
    #[error("Index {index} is too far past the end of an array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Type alias for Result with FieldError.
pub type FieldResult<T> = Result<T, FieldError>;
