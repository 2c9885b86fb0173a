//! Service configuration.

/// Id assignment policy for the in-memory user collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Next id is the highest live id plus one; ids of deleted tail
    /// records can be handed out again.
    #[default]
    MaxPlusOne,
    /// Next id comes from a counter that never goes backwards.
    Monotonic,
}

/// Student service configuration.
#[derive(Debug, Clone)]
pub struct StudentConfig {
    /// Base URL of the Supabase project (without `/rest/v1`)
    pub supabase_url: String,
    /// API key sent as `apikey` and bearer token
    pub supabase_key: String,
    /// Table holding the student rows
    pub table: String,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Replace upstream error text with a generic message in responses
    pub redact_store_errors: bool,
}

impl Default for StudentConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_key: String::new(),
            table: "students".to_string(),
            request_timeout_ms: 5000,
            redact_store_errors: false,
        }
    }
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserConfig {
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// How new user ids are chosen
    pub id_policy: IdPolicy,
    /// Start with the three sample users
    pub seed: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5000,
            id_policy: IdPolicy::MaxPlusOne,
            seed: true,
        }
    }
}
