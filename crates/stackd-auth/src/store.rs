//! Credential store
//!
//! Persistence seam for user records. Check-then-insert sequences in the
//! identity service are not transactional against concurrent duplicates;
//! atomicity is whatever the backing store provides.

use async_trait::async_trait;
use parking_lot::RwLock;
use stackd_common::{Result, User};
use std::collections::HashMap;

/// User record persistence
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up the unique record for `name`
    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;
    /// Insert a new record
    async fn insert(&self, user: User) -> Result<()>;
    /// Replace the record with the same name
    async fn replace(&self, user: User) -> Result<()>;
    /// Number of stored records
    async fn count(&self) -> Result<usize>;
    /// All stored records
    async fn list_all(&self) -> Result<Vec<User>>;
}

/// In-memory credential store
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.users.read().get(name).cloned())
    }

    async fn insert(&self, user: User) -> Result<()> {
        self.users.write().insert(user.name.clone(), user);
        Ok(())
    }

    async fn replace(&self, user: User) -> Result<()> {
        self.users.write().insert(user.name.clone(), user);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.users.read().len())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.users.read().values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackd_common::Role;

    fn user(name: &str) -> User {
        User {
            name: name.into(),
            password_hash: "salt$hash".into(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn insert_and_find() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.count().await.unwrap(), 0);

        store.insert(user("alice")).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_by_name("alice").await.unwrap().is_some());
        assert!(store.find_by_name("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn replace_keeps_one_record() {
        let store = MemoryCredentialStore::new();
        store.insert(user("alice")).await.unwrap();

        let mut updated = user("alice");
        updated.role = Role::Admin;
        store.replace(updated).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        let found = store.find_by_name("alice").await.unwrap().unwrap();
        assert_eq!(found.role, Role::Admin);
    }
}
