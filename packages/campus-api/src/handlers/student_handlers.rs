//! Student service handlers.
//!
//! Every success is wrapped as `{message, data}` and every failure as
//! `{status, error}`. Store failures become 500s whose message is the
//! operation prefix followed by the store's own message.

use hyper::{body::Bytes, Response};
use serde_json::json;

use campus_core::coerce::parse_int_str;
use campus_core::{NewStudent, StudentPatch, ValidationError};

use super::request_utils::{json_response, query_param, Fields};
use super::response::envelope;
use crate::router::{RouterError, StudentState, STUDENT_ENDPOINTS};

/// Lists all students ordered by id.
///
/// # Endpoint
/// `GET /students`
///
/// # Errors
/// - **500 Internal Server Error**: store failure
pub async fn list_students(state: &StudentState) -> Result<Response<Bytes>, RouterError> {
    let students = state
        .store
        .list()
        .await
        .map_err(|e| state.store_failure("Failed to retrieve students", e))?;

    json_response(200, &envelope(students, "All students retrieved successfully"))
}

/// Reads one student.
///
/// # Endpoint
/// `GET /students/{id}`
///
/// # Response
/// - **200 OK**
/// ```json
/// {
///   "message": "Student retrieved successfully",
///   "data": { "id": 1, "name": "Kim", "age": 20, "grade": 1 }
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: id has no integer prefix
/// - **404 Not Found**: no student with that id
/// - **500 Internal Server Error**: store failure
pub async fn read_student(
    state: &StudentState,
    raw_id: &str,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_student_id(raw_id)?;

    let student = state
        .store
        .find(id)
        .await
        .map_err(|e| state.store_failure("Failed to retrieve student", e))?
        .ok_or_else(|| not_found(id))?;

    json_response(200, &envelope(student, "Student retrieved successfully"))
}

/// Creates a student.
///
/// # Endpoint
/// `POST /students`
///
/// # Request Body
/// ```json
/// { "name": "Kim", "age": 20, "grade": 1 }
/// ```
///
/// # Response
/// - **201 Created**: the stored row, including its assigned id
///
/// # Errors
/// - **400 Bad Request**: `Required fields missing: name, age, grade`
/// - **500 Internal Server Error**: store failure
///
/// # Example
/// ```bash
/// curl -X POST http://localhost:5000/students \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Kim", "age": 20, "grade": 1}'
/// ```
pub async fn create_student(
    state: &StudentState,
    fields: Fields,
) -> Result<Response<Bytes>, RouterError> {
    let new_student = NewStudent::from_body(&fields)?;

    let student = state
        .store
        .insert(&new_student)
        .await
        .map_err(|e| state.store_failure("Failed to create student", e))?;

    tracing::info!("Created student {}", student.id);
    json_response(201, &envelope(student, "Student created successfully"))
}

/// Partially updates a student.
///
/// # Endpoint
/// `PUT /students/{id}`
///
/// # Request Body
/// Any subset of `name`, `age`, `grade`. Fields left out are unchanged.
///
/// # Errors
/// - **400 Bad Request**: invalid id, or `No data to update`
/// - **404 Not Found**: no student with that id
/// - **500 Internal Server Error**: store failure during the existence
///   check or the update
///
/// # Notes
/// - Existence is checked before the body is validated, so an empty
///   update of a missing student is a 404.
pub async fn update_student(
    state: &StudentState,
    raw_id: &str,
    fields: Fields,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_student_id(raw_id)?;

    state
        .store
        .find(id)
        .await
        .map_err(|e| state.store_failure("Failed to check student", e))?
        .ok_or_else(|| not_found(id))?;

    let patch = StudentPatch::from_body(&fields)?;

    let student = state
        .store
        .update(id, &patch)
        .await
        .map_err(|e| state.store_failure("Failed to update student", e))?
        .ok_or_else(|| not_found(id))?;

    json_response(200, &envelope(student, "Student updated successfully"))
}

/// Deletes a student and echoes its id and name.
///
/// # Endpoint
/// `DELETE /students/{id}`
///
/// # Response
/// - **200 OK**
/// ```json
/// {
///   "message": "Student deleted successfully",
///   "data": { "id": 1, "name": "Kim" }
/// }
/// ```
///
/// # Errors
/// - **400 Bad Request**: invalid id
/// - **404 Not Found**: no student with that id
/// - **500 Internal Server Error**: store failure
pub async fn delete_student(
    state: &StudentState,
    raw_id: &str,
) -> Result<Response<Bytes>, RouterError> {
    let id = parse_student_id(raw_id)?;

    let summary = state
        .store
        .find_summary(id)
        .await
        .map_err(|e| state.store_failure("Failed to check student", e))?
        .ok_or_else(|| not_found(id))?;

    state
        .store
        .delete(id)
        .await
        .map_err(|e| state.store_failure("Failed to delete student", e))?;

    tracing::info!("Deleted student {}", id);
    json_response(200, &envelope(summary, "Student deleted successfully"))
}

/// Searches students by a case-insensitive name fragment.
///
/// # Endpoint
/// `GET /students/search?name=<fragment>`
///
/// # Errors
/// - **400 Bad Request**: `name` missing or empty
/// - **500 Internal Server Error**: store failure
///
/// # Notes
/// - No match is a 200 with an empty list.
pub async fn search_students(
    state: &StudentState,
    query: Option<&str>,
) -> Result<Response<Bytes>, RouterError> {
    let name = query_param(query, "name")
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingSearchTerm)?;

    let students = state
        .store
        .search_by_name(&name)
        .await
        .map_err(|e| state.store_failure("Failed to search students", e))?;

    json_response(
        200,
        &envelope(students, format!("Search for '{}' completed", name)),
    )
}

/// `GET /health`
pub fn health() -> Result<Response<Bytes>, RouterError> {
    json_response(
        200,
        &envelope(json!({"status": "healthy"}), "API server is running normally"),
    )
}

/// `GET /` lists the available endpoints.
pub fn student_root() -> Result<Response<Bytes>, RouterError> {
    let endpoints: serde_json::Map<String, serde_json::Value> = STUDENT_ENDPOINTS
        .iter()
        .map(|(route, description)| (route.to_string(), json!(description)))
        .collect();

    json_response(
        200,
        &envelope(json!({ "endpoints": endpoints }), "REST API Server"),
    )
}

fn parse_student_id(raw: &str) -> Result<i64, RouterError> {
    parse_int_str(raw).ok_or_else(|| {
        RouterError::Validation(ValidationError::InvalidId {
            entity: "student",
            raw: raw.to_string(),
        })
    })
}

fn not_found(id: i64) -> RouterError {
    RouterError::NotFound(format!("Student with ID {} not found", id))
}
