//! HTTP endpoint implementations for the student and user services.

pub mod request_utils;
pub mod response;
pub mod student_handlers;
pub mod user_handlers;

pub use response::{bare_error, envelope, status_error};
pub use student_handlers::*;
pub use user_handlers::*;
