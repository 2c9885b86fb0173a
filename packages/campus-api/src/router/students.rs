//! Student service routes.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;

use campus_core::config::StudentConfig;
use campus_core::store::StudentStore;
use campus_core::StoreError;

use super::{lookup_method, lookup_path, strip_head_body, RouterError, Routes};
use crate::handlers;
use crate::handlers::request_utils::{body_fields, json_response, raw_response, BodyFormat};
use crate::handlers::response::status_error;

/// Endpoint table served at `/` and logged at startup.
pub const STUDENT_ENDPOINTS: &[(&str, &str)] = &[
    ("GET /students", "Get all students"),
    ("GET /students/:id", "Get specific student"),
    ("POST /students", "Create new student"),
    ("PUT /students/:id", "Update student information"),
    ("DELETE /students/:id", "Delete student"),
    ("GET /students/search?name=<name>", "Search students by name"),
    ("GET /health", "Health check"),
];

/// Shared student service state.
#[derive(Clone)]
pub struct StudentState {
    /// Remote student collection
    pub store: Arc<dyn StudentStore>,
    /// Service configuration
    pub config: Arc<StudentConfig>,
}

impl StudentState {
    /// Logs a store failure and turns it into a 500 whose message is
    /// `context` followed by the store's message.
    pub fn store_failure(&self, context: &str, err: StoreError) -> RouterError {
        tracing::warn!("{}: {:?}", context, err);
        if self.config.redact_store_errors {
            RouterError::InternalError(format!("{}: upstream store error", context))
        } else {
            RouterError::InternalError(format!("{}: {}", context, err.message()))
        }
    }
}

/// HTTP router for the student service.
pub struct StudentRouter {
    inner: MatchitRouter<StudentRoute>,
    state: StudentState,
}

/// Route handler family.
#[derive(Debug, Clone, Copy)]
enum StudentRoute {
    Root,
    Health,
    Collection,
    Search,
    Item,
}

impl StudentRouter {
    /// Creates a router with the student routes.
    pub fn new(store: Arc<dyn StudentStore>, config: Arc<StudentConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/", StudentRoute::Root)
            .expect("Failed to insert / route");
        router
            .insert("/health", StudentRoute::Health)
            .expect("Failed to insert /health route");
        router
            .insert("/students", StudentRoute::Collection)
            .expect("Failed to insert /students route");
        // Static segment takes priority over {id}
        router
            .insert("/students/search", StudentRoute::Search)
            .expect("Failed to insert /students/search route");
        router
            .insert("/students/{id}", StudentRoute::Item)
            .expect("Failed to insert /students/{id} route");

        Self {
            inner: router,
            state: StudentState { store, config },
        }
    }

    async fn dispatch(&self, req: Request<Bytes>) -> Result<Response<Bytes>, RouterError> {
        let (parts, body) = req.into_parts();
        let path = parts.uri.path();
        let no_route = || RouterError::NoRoute {
            method: parts.method.clone(),
            path: path.to_string(),
        };

        let matched = self.inner.at(lookup_path(path)).map_err(|_| no_route())?;
        let state = &self.state;
        let id = matched.params.get("id").unwrap_or("");

        match (*matched.value, &lookup_method(&parts.method)) {
            (StudentRoute::Root, &Method::GET) => handlers::student_root(),
            (StudentRoute::Health, &Method::GET) => handlers::health(),
            (StudentRoute::Collection, &Method::GET) => handlers::list_students(state).await,
            (StudentRoute::Collection, &Method::POST) => {
                let fields = body_fields(&parts.headers, &body, BodyFormat::Json)?;
                handlers::create_student(state, fields).await
            }
            (StudentRoute::Search, &Method::GET) => {
                handlers::search_students(state, parts.uri.query()).await
            }
            (StudentRoute::Item, &Method::GET) => handlers::read_student(state, id).await,
            (StudentRoute::Item, &Method::PUT) => {
                let fields = body_fields(&parts.headers, &body, BodyFormat::Json)?;
                handlers::update_student(state, id, fields).await
            }
            (StudentRoute::Item, &Method::DELETE) => handlers::delete_student(state, id).await,
            _ => Err(no_route()),
        }
    }
}

#[async_trait]
impl Routes for StudentRouter {
    async fn route(&self, req: Request<Bytes>) -> Response<Bytes> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut response = match self.dispatch(req).await {
            Ok(response) => response,
            Err(err) => self.reject(err),
        };
        strip_head_body(&method, &mut response);

        tracing::debug!("{} {} -> {}", method, path, response.status());
        response
    }

    fn reject(&self, err: RouterError) -> Response<Bytes> {
        if let RouterError::NoRoute { .. } = err {
            return raw_response(404, "text/plain; charset=utf-8", err.to_string().into_bytes());
        }

        let status = err.status();
        json_response(status, &status_error(status, err.to_string())).unwrap_or_else(|e| {
            tracing::error!("Failed to render error response: {}", e);
            raw_response(500, "text/plain; charset=utf-8", b"Internal Server Error".to_vec())
        })
    }

    fn request_timeout_ms(&self) -> u64 {
        self.state.config.request_timeout_ms
    }
}
