//! Matchit routing for both services.

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use campus_core::ValidationError;

mod students;
mod users;

pub use students::{StudentRouter, StudentState, STUDENT_ENDPOINTS};
pub use users::{UserRouter, UserState, USER_ENDPOINTS};

/// A service's routing table plus its way of rendering errors.
#[async_trait]
pub trait Routes: Send + Sync + 'static {
    /// Routes a request whose body has already been read.
    async fn route(&self, req: Request<Bytes>) -> Response<Bytes>;

    /// Renders an error raised before routing (e.g. a body read timeout).
    fn reject(&self, err: RouterError) -> Response<Bytes>;

    /// Upper bound for reading a request body.
    fn request_timeout_ms(&self) -> u64;
}

/// Path looked up in a route table. One trailing slash is ignored, so
/// `/api/users/` reaches the same handler as `/api/users`.
pub(crate) fn lookup_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}

/// Method looked up in a route table; `HEAD` is answered by the `GET` arm.
pub(crate) fn lookup_method(method: &Method) -> Method {
    if method == Method::HEAD {
        Method::GET
    } else {
        method.clone()
    }
}

/// Drops the body of a response to a `HEAD` request.
pub(crate) fn strip_head_body(method: &Method, response: &mut Response<Bytes>) {
    if method == Method::HEAD {
        *response.body_mut() = Bytes::new();
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    /// Client data failed validation
    Validation(ValidationError),
    /// The addressed record does not exist
    NotFound(String),
    /// No handler for this verb and path
    NoRoute { method: Method, path: String },
    /// Body could not be parsed
    MalformedBody(String),
    /// Body was not received in time
    Timeout,
    /// Store failure or any other fault
    InternalError(String),
}

impl RouterError {
    /// HTTP status code the error maps to.
    pub fn status(&self) -> u16 {
        match self {
            RouterError::Validation(_) | RouterError::MalformedBody(_) => 400,
            RouterError::NotFound(_) | RouterError::NoRoute { .. } => 404,
            RouterError::Timeout => 408,
            RouterError::InternalError(_) => 500,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::Validation(err) => write!(f, "{}", err),
            RouterError::NotFound(msg) => write!(f, "{}", msg),
            RouterError::NoRoute { method, path } => write!(f, "Cannot {} {}", method, path),
            RouterError::MalformedBody(msg) => write!(f, "Invalid JSON body: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::InternalError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<ValidationError> for RouterError {
    fn from(err: ValidationError) -> Self {
        RouterError::Validation(err)
    }
}
