//! Drives `SupabaseStore` against a one-shot local HTTP responder and checks
//! the PostgREST request it produced.

use std::collections::HashMap;

use campus_core::config::StudentConfig;
use campus_core::store::{StudentStore, SupabaseStore};
use campus_core::{NewStudent, StoreError, StudentPatch};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the responder saw.
struct Recorded {
    request_line: String,
    headers: HashMap<String, String>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Accepts one connection, records the request and answers with `reply`.
async fn respond_once(
    table: &str,
    status: u16,
    reply: &'static str,
) -> (SupabaseStore, JoinHandle<Recorded>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = StudentConfig {
        supabase_url: format!("http://{}", listener.local_addr().unwrap()),
        supabase_key: "test-key".to_string(),
        table: table.to_string(),
        ..Default::default()
    };

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request head");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
        };

        let head = String::from_utf8(buf[..head_end].to_vec()).unwrap();
        let mut lines = head.split("\r\n");
        let request_line = lines.next().unwrap().to_string();
        let headers: HashMap<String, String> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
            .collect();

        let length: usize = headers
            .get("content-length")
            .map(|v| v.parse().unwrap())
            .unwrap_or(0);
        let mut body = buf[head_end + 4..].to_vec();
        while body.len() < length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before the request body");
            body.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            reply.len(),
            reply
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        Recorded {
            request_line,
            headers,
            body: String::from_utf8(body).unwrap(),
        }
    });

    (SupabaseStore::new(&config).unwrap(), handle)
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_list_orders_by_id_and_sends_credentials() {
    let (store, seen) = respond_once(
        "students",
        200,
        r#"[{"id":1,"name":"Kim","age":20,"grade":1,"created_at":"2024-03-01"}]"#,
    )
    .await;

    let rows = store.list().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name.as_deref(), Some("Kim"));
    assert_eq!(rows[0].extra["created_at"], "2024-03-01");

    let seen = seen.await.unwrap();
    assert_eq!(
        seen.request_line,
        "GET /rest/v1/students?select=*&order=id.asc HTTP/1.1"
    );
    assert_eq!(seen.header("apikey"), Some("test-key"));
    assert_eq!(seen.header("authorization"), Some("Bearer test-key"));
    assert_eq!(seen.header("prefer"), None);
}

#[tokio::test]
async fn test_find_filters_by_id_on_configured_table() {
    let (store, seen) = respond_once("pupils", 200, "[]").await;

    assert_eq!(store.find(7).await.unwrap(), None);

    let seen = seen.await.unwrap();
    assert_eq!(
        seen.request_line,
        "GET /rest/v1/pupils?select=*&id=eq.7 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_find_summary_selects_name_only() {
    let (store, seen) = respond_once("students", 200, r#"[{"name":"Lee"}]"#).await;

    let summary = store.find_summary(7).await.unwrap().unwrap();
    assert_eq!(summary.id, 7);
    assert_eq!(summary.name.as_deref(), Some("Lee"));

    let seen = seen.await.unwrap();
    assert_eq!(
        seen.request_line,
        "GET /rest/v1/students?select=name&id=eq.7 HTTP/1.1"
    );
}

#[tokio::test]
async fn test_search_uses_ilike_wildcards() {
    let (store, seen) = respond_once("students", 200, "[]").await;

    assert!(store.search_by_name("Kim").await.unwrap().is_empty());

    let seen = seen.await.unwrap();
    assert_eq!(
        seen.request_line,
        "GET /rest/v1/students?select=*&name=ilike.*Kim* HTTP/1.1"
    );
}

#[tokio::test]
async fn test_insert_posts_row_and_asks_for_representation() {
    let (store, seen) = respond_once(
        "students",
        201,
        r#"[{"id":3,"name":"Kim","age":20,"grade":1}]"#,
    )
    .await;

    let new = NewStudent::from_body(&fields(json!({"name": "Kim", "age": "20", "grade": 1})))
        .unwrap();
    let row = store.insert(&new).await.unwrap();
    assert_eq!(row.id, 3);

    let seen = seen.await.unwrap();
    assert_eq!(seen.request_line, "POST /rest/v1/students HTTP/1.1");
    assert_eq!(seen.header("prefer"), Some("return=representation"));
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.json(), json!({"name": "Kim", "age": 20, "grade": 1}));
}

#[tokio::test]
async fn test_update_sends_only_supplied_fields() {
    let (store, seen) = respond_once(
        "students",
        200,
        r#"[{"id":3,"name":"Kim","age":20,"grade":2}]"#,
    )
    .await;

    let patch = StudentPatch::from_body(&fields(json!({"grade": 2}))).unwrap();
    let row = store.update(3, &patch).await.unwrap().unwrap();
    assert_eq!(row.grade, Some(2));

    let seen = seen.await.unwrap();
    assert_eq!(seen.request_line, "PATCH /rest/v1/students?id=eq.3 HTTP/1.1");
    assert_eq!(seen.header("prefer"), Some("return=representation"));
    assert_eq!(seen.json(), json!({"grade": 2}));
}

#[tokio::test]
async fn test_update_of_vanished_row_is_none() {
    let (store, _seen) = respond_once("students", 200, "[]").await;

    let patch = StudentPatch::from_body(&fields(json!({"age": 21}))).unwrap();
    assert_eq!(store.update(3, &patch).await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_filters_by_id() {
    let (store, seen) = respond_once("students", 200, r#"[{"id":3}]"#).await;

    store.delete(3).await.unwrap();

    let seen = seen.await.unwrap();
    assert_eq!(seen.request_line, "DELETE /rest/v1/students?id=eq.3 HTTP/1.1");
    assert_eq!(seen.header("prefer"), Some("return=representation"));
}

#[tokio::test]
async fn test_error_status_becomes_upstream_error() {
    let (store, _seen) = respond_once(
        "students",
        400,
        r#"{"code":"22P02","details":null,"hint":null,"message":"invalid input syntax for type bigint"}"#,
    )
    .await;

    let err = store.list().await.unwrap_err();
    assert_eq!(
        err,
        StoreError::Upstream {
            status: 400,
            message: "invalid input syntax for type bigint".to_string(),
        }
    );
    assert_eq!(err.message(), "invalid input syntax for type bigint");
}

#[tokio::test]
async fn test_non_json_success_is_decode_error() {
    let (store, _seen) = respond_once("students", 200, "<html>").await;

    assert!(matches!(
        store.list().await.unwrap_err(),
        StoreError::Decode(_)
    ));
}
