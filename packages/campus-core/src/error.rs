//! Store and validation error types.

use thiserror::Error;

/// Failures reported by a student store.
///
/// The variants only record where the failure came from; callers never
/// inspect the message beyond embedding it in a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The remote store answered with an error status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The request never produced a response
    #[error("{0}")]
    Transport(String),

    /// The response body did not have the expected shape
    #[error("{0}")]
    Decode(String),
}

impl StoreError {
    /// Returns the raw message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            StoreError::Upstream { message, .. } => message,
            StoreError::Transport(message) | StoreError::Decode(message) => message,
        }
    }
}

/// Client-supplied data that cannot be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Student create payload lacks a required field
    #[error("Required fields missing: name, age, grade")]
    MissingStudentFields,

    /// User create payload lacks a required field
    #[error("Please provide name, email, and age")]
    MissingUserFields,

    /// Student update payload names no known field
    #[error("No data to update")]
    EmptyUpdate,

    /// Search request without a usable `name` parameter
    #[error("Please provide a name to search")]
    MissingSearchTerm,

    /// Path id that does not start with an integer
    #[error("Invalid {entity} ID '{raw}'")]
    InvalidId { entity: &'static str, raw: String },
}
