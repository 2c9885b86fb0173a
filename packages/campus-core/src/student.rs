//! Student records and request validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{parse_int, to_text, truthy};
use crate::error::ValidationError;

/// A student row as returned by the store.
///
/// Columns beyond the four known ones (timestamps and the like) are kept in
/// `extra` and passed through to clients untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub grade: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identifying fields captured before a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    pub name: Option<String>,
}

/// Insert payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStudent {
    pub name: String,
    pub age: Option<i64>,
    pub grade: Option<i64>,
}

impl NewStudent {
    /// Validates a create body. `name`, `age`, and `grade` must all be
    /// present and truthy.
    pub fn from_body(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        match (
            truthy(fields, "name"),
            truthy(fields, "age"),
            truthy(fields, "grade"),
        ) {
            (Some(name), Some(age), Some(grade)) => Ok(Self {
                name: to_text(name),
                age: parse_int(age),
                grade: parse_int(grade),
            }),
            _ => Err(ValidationError::MissingStudentFields),
        }
    }
}

/// Partial update payload.
///
/// Outer `None` means the field was not supplied and is left out of the
/// update; `Some(None)` writes `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Option<i64>>,
}

impl StudentPatch {
    /// Validates an update body. Any key that is present counts as
    /// supplied, `null` included; at least one must be.
    pub fn from_body(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        let patch = Self {
            name: fields.get("name").map(|v| match v {
                Value::Null => None,
                other => Some(to_text(other)),
            }),
            age: fields.get("age").map(parse_int),
            grade: fields.get("grade").map(parse_int),
        };
        if patch.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.grade.is_none()
    }

    /// Applies the patch to a copy of `student`.
    pub fn apply(&self, student: &Student) -> Student {
        let mut updated = student.clone();
        if let Some(name) = &self.name {
            updated.name = name.clone();
        }
        if let Some(age) = self.age {
            updated.age = age;
        }
        if let Some(grade) = self.grade {
            updated.grade = grade;
        }
        updated
    }
}
