//! In-memory user storage.
//!
//! `UserStore` does no locking of its own; `UserService` wraps it in a
//! `RwLock` and holds the write guard across every check-then-act sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Fields to overwrite on an existing user. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserUpdate {
    /// Whether applying this update would change nothing.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Keyed collection of live users. Every key equals the `id` of its value.
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<UserId, User>,
}

impl UserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user keyed by its id.
    ///
    /// Ids come from `UserId::generate`, so an existing entry is never
    /// expected; if one is present it is replaced.
    pub fn insert(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    /// Look up a user by id.
    pub fn get(&self, id: &UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Overwrite the fields present in `update`, returning the new record.
    pub fn update(&mut self, id: &UserId, update: UserUpdate) -> Option<&User> {
        let user = self.users.get_mut(id)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        Some(&*user)
    }

    /// Remove a user. Returns `false` when no such id is live.
    pub fn delete(&mut self, id: &UserId) -> bool {
        self.users.remove(id).is_some()
    }

    /// Whether any live user already holds `email` (exact match).
    pub fn exists_email(&self, email: &str) -> bool {
        self.users.values().any(|u| u.email == email)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.users.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
