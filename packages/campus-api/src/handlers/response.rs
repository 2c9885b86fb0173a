//! Response envelopes.
//!
//! The two services speak different shapes and the shapes are kept apart:
//! the student service wraps every payload in [`Envelope`] and every error
//! in [`StatusError`]; the user service returns bare entities and
//! [`BareError`].

use serde::Serialize;

use campus_core::User;

/// Student service success wrapper
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Human-readable outcome
    pub message: String,
    /// Response data
    pub data: T,
}

/// Student service error wrapper
#[derive(Debug, Serialize)]
pub struct StatusError {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Error message
    pub error: String,
}

/// User service error wrapper
#[derive(Debug, Serialize)]
pub struct BareError {
    pub error: String,
}

/// User service delete confirmation
#[derive(Debug, Serialize)]
pub struct DeletedUser {
    pub message: String,
    #[serde(rename = "deletedUser")]
    pub deleted_user: User,
}

/// Helper to create a student service success body
pub fn envelope<T: Serialize>(data: T, message: impl Into<String>) -> Envelope<T> {
    Envelope {
        message: message.into(),
        data,
    }
}

/// Helper to create a student service error body
pub fn status_error(status: u16, error: impl Into<String>) -> StatusError {
    StatusError {
        status,
        error: error.into(),
    }
}

/// Helper to create a user service error body
pub fn bare_error(error: impl Into<String>) -> BareError {
    BareError {
        error: error.into(),
    }
}
