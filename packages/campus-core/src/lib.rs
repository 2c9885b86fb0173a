//! Entity models, request validation, and store adapters shared by the
//! student and user services.
//!
//! Students live in a remote PostgREST store reached through
//! [`store::SupabaseStore`]; users live in the process-owned
//! [`store::UserStore`].

pub mod coerce;
pub mod config;
pub mod error;
pub mod store;
pub mod student;
pub mod user;

pub use error::{StoreError, ValidationError};
pub use student::{NewStudent, Student, StudentPatch};
pub use user::{NewUser, User, UserPatch};
