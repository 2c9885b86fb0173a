//! Shared helpers for router tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{Request, Response};
use parking_lot::Mutex;
use serde_json::Value;

use campus_core::store::StudentStore;
use campus_core::student::StudentSummary;
use campus_core::{NewStudent, StoreError, Student, StudentPatch};

/// In-memory stand-in for the remote student table.
pub struct MemoryStudentStore {
    rows: Mutex<Vec<Student>>,
    next_id: AtomicI64,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let mut rows = self.rows.lock().clone();
        rows.sort_by_key(|s| s.id);
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Student>, StoreError> {
        Ok(self.rows.lock().iter().find(|s| s.id == id).cloned())
    }

    async fn find_summary(&self, id: i64) -> Result<Option<StudentSummary>, StoreError> {
        Ok(self
            .rows
            .lock()
            .iter()
            .find(|s| s.id == id)
            .map(|s| StudentSummary {
                id,
                name: s.name.clone(),
            }))
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, StoreError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|s| {
                s.name
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, student: &NewStudent) -> Result<Student, StoreError> {
        let row = Student {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: Some(student.name.clone()),
            age: student.age,
            grade: student.grade,
            extra: Default::default(),
        };
        self.rows.lock().push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, patch: &StudentPatch) -> Result<Option<Student>, StoreError> {
        let mut rows = self.rows.lock();
        Ok(rows.iter_mut().find(|s| s.id == id).map(|row| {
            *row = patch.apply(row);
            row.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.rows.lock().retain(|s| s.id != id);
        Ok(())
    }
}

/// Store whose every call fails like an unreachable upstream.
pub struct FailingStudentStore {
    pub message: String,
}

impl FailingStudentStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Upstream {
            status: 503,
            message: self.message.clone(),
        })
    }
}

#[async_trait]
impl StudentStore for FailingStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        self.fail()
    }

    async fn find(&self, _id: i64) -> Result<Option<Student>, StoreError> {
        self.fail()
    }

    async fn find_summary(&self, _id: i64) -> Result<Option<StudentSummary>, StoreError> {
        self.fail()
    }

    async fn search_by_name(&self, _fragment: &str) -> Result<Vec<Student>, StoreError> {
        self.fail()
    }

    async fn insert(&self, _student: &NewStudent) -> Result<Student, StoreError> {
        self.fail()
    }

    async fn update(&self, _id: i64, _patch: &StudentPatch) -> Result<Option<Student>, StoreError> {
        self.fail()
    }

    async fn delete(&self, _id: i64) -> Result<(), StoreError> {
        self.fail()
    }
}

/// Store whose reads succeed against `rows` but whose writes fail.
pub struct ReadOnlyStudentStore {
    pub rows: MemoryStudentStore,
    pub message: String,
}

impl ReadOnlyStudentStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Upstream {
            status: 503,
            message: self.message.clone(),
        })
    }
}

#[async_trait]
impl StudentStore for ReadOnlyStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        self.rows.list().await
    }

    async fn find(&self, id: i64) -> Result<Option<Student>, StoreError> {
        self.rows.find(id).await
    }

    async fn find_summary(&self, id: i64) -> Result<Option<StudentSummary>, StoreError> {
        self.rows.find_summary(id).await
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>, StoreError> {
        self.rows.search_by_name(fragment).await
    }

    async fn insert(&self, _student: &NewStudent) -> Result<Student, StoreError> {
        self.fail()
    }

    async fn update(&self, _id: i64, _patch: &StudentPatch) -> Result<Option<Student>, StoreError> {
        self.fail()
    }

    async fn delete(&self, _id: i64) -> Result<(), StoreError> {
        self.fail()
    }
}

pub fn get(uri: &str) -> Request<Bytes> {
    request("GET", uri, None)
}

pub fn delete(uri: &str) -> Request<Bytes> {
    request("DELETE", uri, None)
}

pub fn post_json(uri: &str, body: Value) -> Request<Bytes> {
    request("POST", uri, Some(body))
}

pub fn put_json(uri: &str, body: Value) -> Request<Bytes> {
    request("PUT", uri, Some(body))
}

pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Bytes> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Bytes::from(body.to_string()))
            .unwrap(),
        None => builder.body(Bytes::new()).unwrap(),
    }
}

/// Returns the status and the JSON body of a response.
pub fn json_body(response: Response<Bytes>) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
    (status, body)
}
