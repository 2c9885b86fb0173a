//! In-memory user collection.

use parking_lot::RwLock;

use crate::config::IdPolicy;
use crate::user::{NewUser, User, UserPatch};

/// Ordered user collection shared by all requests.
///
/// Each operation takes the lock once, so id assignment plus push and
/// lookup plus splice can not interleave with other writers.
#[derive(Debug)]
pub struct UserStore {
    inner: RwLock<UserTable>,
}

#[derive(Debug)]
struct UserTable {
    users: Vec<User>,
    policy: IdPolicy,
    /// Highest id ever handed out; only consulted under `IdPolicy::Monotonic`
    high_water: i64,
}

impl UserTable {
    fn next_id(&self) -> i64 {
        let max_live = self.users.iter().map(|u| u.id).max().unwrap_or(0);
        match self.policy {
            IdPolicy::MaxPlusOne => max_live + 1,
            IdPolicy::Monotonic => max_live.max(self.high_water) + 1,
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }
}

impl UserStore {
    /// Creates an empty store.
    pub fn new(policy: IdPolicy) -> Self {
        Self::with_users(policy, Vec::new())
    }

    /// Creates a store holding the sample users.
    pub fn seeded(policy: IdPolicy) -> Self {
        Self::with_users(policy, seed_users())
    }

    /// Creates a store holding `users` in the given order.
    pub fn with_users(policy: IdPolicy, users: Vec<User>) -> Self {
        let high_water = users.iter().map(|u| u.id).max().unwrap_or(0);
        Self {
            inner: RwLock::new(UserTable {
                users,
                policy,
                high_water,
            }),
        }
    }

    /// Returns every user in insertion order.
    pub fn list(&self) -> Vec<User> {
        self.inner.read().users.clone()
    }

    pub fn get(&self, id: i64) -> Option<User> {
        let table = self.inner.read();
        table.users.iter().find(|u| u.id == id).cloned()
    }

    /// Assigns an id, appends the user, and returns the stored record.
    pub fn insert(&self, new_user: NewUser) -> User {
        let mut table = self.inner.write();
        let id = table.next_id();
        table.high_water = table.high_water.max(id);
        let user = new_user.with_id(id);
        table.users.push(user.clone());
        tracing::debug!("Inserted user {}", id);
        user
    }

    /// Overrides the supplied fields in place. Returns `None` if no user
    /// has the id.
    pub fn update(&self, id: i64, patch: UserPatch) -> Option<User> {
        let mut table = self.inner.write();
        let index = table.position(id)?;
        let user = &mut table.users[index];
        patch.apply_to(user);
        Some(user.clone())
    }

    /// Removes the user, keeping the order of the rest. Returns the removed
    /// record.
    pub fn remove(&self, id: i64) -> Option<User> {
        let mut table = self.inner.write();
        let index = table.position(id)?;
        let removed = table.users.remove(index);
        tracing::debug!("Removed user {}", id);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::seeded(IdPolicy::default())
    }
}

/// The three sample users a fresh service starts with.
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "김철수".to_string(),
            email: "kim@example.com".to_string(),
            age: Some(25),
        },
        User {
            id: 2,
            name: "이영희".to_string(),
            email: "lee@example.com".to_string(),
            age: Some(30),
        },
        User {
            id: 3,
            name: "박민수".to_string(),
            email: "park@example.com".to_string(),
            age: Some(28),
        },
    ]
}
