//! Request utilities for HTTP endpoints.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::time;

use crate::router::RouterError;

/// Parsed body fields
pub type Fields = Map<String, Value>;

/// Reads a request body with a timeout.
pub async fn read_body_with_timeout<B>(body: B, timeout_ms: u64) -> Result<Bytes, RouterError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let timeout_duration = time::Duration::from_millis(timeout_ms);
    let collected = time::timeout(timeout_duration, body.collect())
        .await
        .map_err(|_| RouterError::Timeout)?
        .map_err(|e| RouterError::InternalError(format!("Failed to read request body: {}", e)))?;
    Ok(collected.to_bytes())
}

/// Body encodings a service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Json,
    JsonOrForm,
}

/// Parses a request body into top-level fields.
///
/// JSON is read when the content type says so or is missing. URL-encoded
/// forms are read only under [`BodyFormat::JsonOrForm`]. Any other content
/// type, an empty body, or a JSON value that is not an object yields no
/// fields.
pub fn body_fields(
    headers: &HeaderMap,
    body: &[u8],
    format: BodyFormat,
) -> Result<Fields, RouterError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase());

    match content_type.as_deref() {
        None => parse_json_fields(body),
        Some(ct) if is_json(ct) => parse_json_fields(body),
        Some(ct)
            if format == BodyFormat::JsonOrForm
                && ct.starts_with("application/x-www-form-urlencoded") =>
        {
            Ok(parse_form_fields(body))
        }
        Some(_) => Ok(Fields::new()),
    }
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence == "application/json" || essence.ends_with("+json")
}

/// Parses a JSON body, keeping only object bodies.
pub fn parse_json_fields(body: &[u8]) -> Result<Fields, RouterError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Fields::new());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| RouterError::MalformedBody(e.to_string()))?;
    Ok(match value {
        Value::Object(fields) => fields,
        _ => Fields::new(),
    })
}

/// Parses an `application/x-www-form-urlencoded` body into string fields.
/// Later duplicates overwrite earlier ones.
pub fn parse_form_fields(body: &[u8]) -> Fields {
    let text = String::from_utf8_lossy(body);
    let mut fields = Fields::new();
    for pair in text.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        fields.insert(decode_component(key), Value::String(decode_component(value)));
    }
    fields
}

/// Returns the first decoded value of `key` in a query string.
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    query?
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| decode_component(k) == key)
        .map(|(_, v)| decode_component(v))
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Helper to build HTTP response with proper error handling
pub fn build_response(status: u16, json: Vec<u8>) -> Result<Response<Bytes>, RouterError> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Bytes::from(json))
        .map_err(|e| RouterError::InternalError(format!("Failed to build response: {}", e)))
}

/// Serializes `payload` and wraps it in a JSON response.
pub fn json_response<T: Serialize>(
    status: u16,
    payload: &T,
) -> Result<Response<Bytes>, RouterError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| RouterError::InternalError(format!("Failed to serialize response: {}", e)))?;
    build_response(status, json)
}

/// Builds a response without going through the fallible builder. Used when
/// rendering errors, where there is nothing left to fall back to.
pub fn raw_response(status: u16, content_type: &'static str, body: Vec<u8>) -> Response<Bytes> {
    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
