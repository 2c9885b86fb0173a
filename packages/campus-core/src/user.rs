//! User records and request validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{parse_int, to_text, truthy};
use crate::error::ValidationError;

/// A user held in the in-memory collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
}

/// Insert payload; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
}

impl NewUser {
    /// Validates a create body. `name`, `email`, and `age` must all be
    /// present and truthy.
    pub fn from_body(fields: &Map<String, Value>) -> Result<Self, ValidationError> {
        match (
            truthy(fields, "name"),
            truthy(fields, "email"),
            truthy(fields, "age"),
        ) {
            (Some(name), Some(email), Some(age)) => Ok(Self {
                name: to_text(name),
                email: to_text(email),
                age: parse_int(age),
            }),
            _ => Err(ValidationError::MissingUserFields),
        }
    }

    pub(crate) fn with_id(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

/// Field overrides for an update. Falsy or absent fields are `None` and
/// keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<Option<i64>>,
}

impl UserPatch {
    /// Builds a patch from an update body. Never fails: an empty body is a
    /// rewrite that changes nothing.
    pub fn from_body(fields: &Map<String, Value>) -> Self {
        Self {
            name: truthy(fields, "name").map(to_text),
            email: truthy(fields, "email").map(to_text),
            age: truthy(fields, "age").map(parse_int),
        }
    }

    pub(crate) fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(age) = self.age {
            user.age = age;
        }
    }
}
