//! User service routes.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::{body::Bytes, Method, Request, Response};
use matchit::Router as MatchitRouter;

use campus_core::config::UserConfig;
use campus_core::store::UserStore;

use super::{lookup_method, lookup_path, strip_head_body, RouterError, Routes};
use crate::handlers;
use crate::handlers::request_utils::{body_fields, json_response, raw_response, BodyFormat};
use crate::handlers::response::bare_error;
use crate::middleware;

/// Endpoint table served at `/` and logged at startup.
pub const USER_ENDPOINTS: &[(&str, &str)] = &[
    ("GET /api/users", "Get all users"),
    ("GET /api/users/:id", "Get specific user"),
    ("POST /api/users", "Create new user"),
    ("PUT /api/users/:id", "Update user information"),
    ("DELETE /api/users/:id", "Delete user"),
];

const ENDPOINT_NOT_FOUND: &str = "Requested endpoint not found";
const INTERNAL_ERROR: &str = "Internal server error";

/// Shared user service state.
#[derive(Clone)]
pub struct UserState {
    /// In-memory user collection
    pub store: Arc<UserStore>,
    /// Service configuration
    pub config: Arc<UserConfig>,
}

/// HTTP router for the user service.
pub struct UserRouter {
    inner: MatchitRouter<UserRoute>,
    state: UserState,
}

/// Route handler family.
#[derive(Debug, Clone, Copy)]
enum UserRoute {
    Root,
    Collection,
    Item,
}

impl UserRouter {
    /// Creates a router with the user routes.
    pub fn new(store: Arc<UserStore>, config: Arc<UserConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/", UserRoute::Root)
            .expect("Failed to insert / route");
        router
            .insert("/api/users", UserRoute::Collection)
            .expect("Failed to insert /api/users route");
        router
            .insert("/api/users/{id}", UserRoute::Item)
            .expect("Failed to insert /api/users/{id} route");

        Self {
            inner: router,
            state: UserState { store, config },
        }
    }

    /// Returns the shared state.
    pub fn state(&self) -> &UserState {
        &self.state
    }

    fn dispatch(&self, req: Request<Bytes>) -> Result<Response<Bytes>, RouterError> {
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
            (UserRoute::Root, &Method::GET) => handlers::user_root(),
            (UserRoute::Collection, &Method::GET) => handlers::list_users(state),
            (UserRoute::Collection, &Method::POST) => {
                let fields = body_fields(&parts.headers, &body, BodyFormat::JsonOrForm)?;
                handlers::create_user(state, fields)
            }
            (UserRoute::Item, &Method::GET) => handlers::read_user(state, id),
            (UserRoute::Item, &Method::PUT) => {
                let fields = body_fields(&parts.headers, &body, BodyFormat::JsonOrForm)?;
                handlers::update_user(state, id, fields)
            }
            (UserRoute::Item, &Method::DELETE) => handlers::delete_user(state, id),
            _ => Err(no_route()),
        }
    }

    fn render_error(err: RouterError) -> Response<Bytes> {
        let (status, message) = match err {
            RouterError::Validation(e) => (400, e.to_string()),
            RouterError::NotFound(msg) => (404, msg),
            RouterError::NoRoute { .. } => (404, ENDPOINT_NOT_FOUND.to_string()),
            RouterError::Timeout => (408, "Request Timeout".to_string()),
            RouterError::MalformedBody(_) | RouterError::InternalError(_) => {
                tracing::error!("Unhandled request error: {}", err);
                (500, INTERNAL_ERROR.to_string())
            }
        };

        json_response(status, &bare_error(message)).unwrap_or_else(|e| {
            tracing::error!("Failed to render error response: {}", e);
            raw_response(500, "text/plain; charset=utf-8", b"Internal Server Error".to_vec())
        })
    }
}

#[async_trait]
impl Routes for UserRouter {
    async fn route(&self, req: Request<Bytes>) -> Response<Bytes> {
        if req.method() == Method::OPTIONS {
            return middleware::preflight(req.headers());
        }

        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let mut response = match self.dispatch(req) {
            Ok(response) => response,
            Err(err) => Self::render_error(err),
        };
        middleware::allow_any_origin(&mut response);
        strip_head_body(&method, &mut response);

        tracing::debug!("{} {} -> {}", method, path, response.status());
        response
    }

    fn reject(&self, err: RouterError) -> Response<Bytes> {
        let mut response = Self::render_error(err);
        middleware::allow_any_origin(&mut response);
        response
    }

    fn request_timeout_ms(&self) -> u64 {
        self.state.config.request_timeout_ms
    }
}
