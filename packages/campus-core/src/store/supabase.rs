//! PostgREST client for a Supabase-hosted student table.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Result, StudentStore};
use crate::config::StudentConfig;
use crate::error::StoreError;
use crate::student::{NewStudent, Student, StudentPatch, StudentSummary};

/// Student store backed by the Supabase REST interface.
///
/// No timeout is configured on the client: a request waits for the store
/// to answer or fail.
#[derive(Debug, Clone)]
pub struct SupabaseStore {
    client: Client,
    /// `<project>/rest/v1/<table>`
    endpoint: String,
}

impl SupabaseStore {
    /// Builds a client for the configured project and table.
    pub fn new(config: &StudentConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.supabase_key)
            .map_err(|e| StoreError::Transport(format!("Invalid API key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.supabase_key))
            .map_err(|e| StoreError::Transport(format!("Invalid API key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: rest_endpoint(&config.supabase_url, &config.table),
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client.request(method, &self.endpoint)
    }

    /// Like [`Self::request`], asking PostgREST to echo the affected rows.
    fn returning(&self, method: Method) -> RequestBuilder {
        self.request(method).header("Prefer", "return=representation")
    }
}

#[async_trait]
impl StudentStore for SupabaseStore {
    async fn list(&self) -> Result<Vec<Student>> {
        let query = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "id.asc")]);
        fetch_rows(query).await
    }

    async fn find(&self, id: i64) -> Result<Option<Student>> {
        let query = self
            .request(Method::GET)
            .query(&[("select", "*".to_string()), ("id", eq(id))]);
        Ok(fetch_rows(query).await?.into_iter().next())
    }

    async fn find_summary(&self, id: i64) -> Result<Option<StudentSummary>> {
        #[derive(Deserialize)]
        struct NameRow {
            name: Option<String>,
        }

        let query = self
            .request(Method::GET)
            .query(&[("select", "name".to_string()), ("id", eq(id))]);
        let rows: Vec<NameRow> = fetch_rows(query).await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| StudentSummary { id, name: row.name }))
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>> {
        let query = self.request(Method::GET).query(&[
            ("select", "*".to_string()),
            ("name", format!("ilike.*{}*", fragment)),
        ]);
        fetch_rows(query).await
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student> {
        let query = self.returning(Method::POST).json(student);
        fetch_rows(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("Insert returned no rows".to_string()))
    }

    async fn update(&self, id: i64, patch: &StudentPatch) -> Result<Option<Student>> {
        let query = self
            .returning(Method::PATCH)
            .query(&[("id", eq(id))])
            .json(patch);
        Ok(fetch_rows(query).await?.into_iter().next())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let query = self.returning(Method::DELETE).query(&[("id", eq(id))]);
        let _deleted: Vec<serde_json::Value> = fetch_rows(query).await?;
        Ok(())
    }
}

fn rest_endpoint(base_url: &str, table: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table)
}

fn eq(id: i64) -> String {
    format!("eq.{}", id)
}

/// Sends the request and decodes a JSON array of rows.
async fn fetch_rows<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>> {
    let response = request
        .send()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(StoreError::Upstream {
            status: status.as_u16(),
            message: upstream_message(status, &body),
        });
    }

    serde_json::from_slice(&body)
        .map_err(|e| StoreError::Decode(format!("Unexpected response from store: {}", e)))
}

/// Extracts the human-readable message from a PostgREST error body.
fn upstream_message(status: StatusCode, body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        msg: Option<String>,
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        if let Some(message) = parsed.message.or(parsed.msg).or(parsed.error) {
            return message;
        }
    }

    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        text.trim().to_string()
    }
}
