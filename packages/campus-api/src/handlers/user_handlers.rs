//! User service handlers.
//!
//! Successes return the bare entity (or entity array); failures return
//! `{error}`.

use hyper::{body::Bytes, Response};
use serde_json::json;

use campus_core::coerce::parse_int_str;
use campus_core::{NewUser, UserPatch};

use super::request_utils::{json_response, Fields};
use super::response::DeletedUser;
use crate::router::{RouterError, UserState, USER_ENDPOINTS};

const USER_NOT_FOUND: &str = "User not found";

/// `GET /` lists the available endpoints.
pub fn user_root() -> Result<Response<Bytes>, RouterError> {
    let endpoints: serde_json::Map<String, serde_json::Value> = USER_ENDPOINTS
        .iter()
        .map(|(route, description)| (route.to_string(), json!(description)))
        .collect();

    json_response(
        200,
        &json!({
            "message": "User API server is running",
            "endpoints": endpoints,
        }),
    )
}

/// Lists users in insertion order.
///
/// # Endpoint
/// `GET /api/users`
pub fn list_users(state: &UserState) -> Result<Response<Bytes>, RouterError> {
    json_response(200, &state.store.list())
}

/// Reads one user.
///
/// # Endpoint
/// `GET /api/users/{id}`
///
/// # Errors
/// - **404 Not Found**: no user with that id (an id with no integer prefix
///   never matches)
pub fn read_user(state: &UserState, raw_id: &str) -> Result<Response<Bytes>, RouterError> {
    let user = parse_int_str(raw_id)
        .and_then(|id| state.store.get(id))
        .ok_or_else(user_not_found)?;

    json_response(200, &user)
}

/// Creates a user.
///
/// # Endpoint
/// `POST /api/users`
///
/// # Request Body
/// JSON or URL-encoded form:
/// ```json
/// { "name": "A", "email": "a@x.com", "age": 20 }
/// ```
///
/// # Response
/// - **201 Created**: the stored user with its assigned id
///
/// # Errors
/// - **400 Bad Request**: a required field is missing or falsy
pub fn create_user(state: &UserState, fields: Fields) -> Result<Response<Bytes>, RouterError> {
    let new_user = NewUser::from_body(&fields)?;
    let user = state.store.insert(new_user);

    tracing::info!("Created user {}", user.id);
    json_response(201, &user)
}

/// Overrides the truthy fields of a user.
///
/// # Endpoint
/// `PUT /api/users/{id}`
///
/// # Errors
/// - **404 Not Found**: no user with that id
///
/// # Notes
/// - An empty body is accepted and leaves the user unchanged.
pub fn update_user(
    state: &UserState,
    raw_id: &str,
    fields: Fields,
) -> Result<Response<Bytes>, RouterError> {
    let patch = UserPatch::from_body(&fields);
    let user = parse_int_str(raw_id)
        .and_then(|id| state.store.update(id, patch))
        .ok_or_else(user_not_found)?;

    json_response(200, &user)
}

/// Removes a user and returns it.
///
/// # Endpoint
/// `DELETE /api/users/{id}`
///
/// # Response
/// - **200 OK**
/// ```json
/// { "message": "User deleted", "deletedUser": { "id": 4, "name": "A", "email": "a@x.com", "age": 20 } }
/// ```
pub fn delete_user(state: &UserState, raw_id: &str) -> Result<Response<Bytes>, RouterError> {
    let deleted_user = parse_int_str(raw_id)
        .and_then(|id| state.store.remove(id))
        .ok_or_else(user_not_found)?;

    tracing::info!("Deleted user {}", deleted_user.id);
    json_response(
        200,
        &DeletedUser {
            message: "User deleted".to_string(),
            deleted_user,
        },
    )
}

fn user_not_found() -> RouterError {
    RouterError::NotFound(USER_NOT_FOUND.to_string())
}
