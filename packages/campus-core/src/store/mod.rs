//! Store adapters.
//!
//! [`StudentStore`] is the seam between the student handlers and the
//! remote database; [`UserStore`] owns the in-memory user collection.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::student::{NewStudent, Student, StudentPatch, StudentSummary};

mod supabase;
mod users;

pub use supabase::SupabaseStore;
pub use users::{seed_users, UserStore};

/// Result type for student store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Remote student collection.
///
/// Every method performs exactly one round trip. Absence is reported as
/// `None` (or an empty list), never as an error.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Returns all students ordered by id.
    async fn list(&self) -> Result<Vec<Student>>;

    /// Point lookup by id.
    async fn find(&self, id: i64) -> Result<Option<Student>>;

    /// Point lookup that only fetches the identifying fields.
    async fn find_summary(&self, id: i64) -> Result<Option<StudentSummary>>;

    /// Case-insensitive substring match on the name.
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Student>>;

    /// Inserts a student and returns the stored row.
    async fn insert(&self, student: &NewStudent) -> Result<Student>;

    /// Writes the supplied fields and returns the updated row, or `None`
    /// if no row matched.
    async fn update(&self, id: i64, patch: &StudentPatch) -> Result<Option<Student>>;

    /// Deletes the row with the given id.
    async fn delete(&self, id: i64) -> Result<()>;
}
