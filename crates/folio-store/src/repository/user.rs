//! # User Repository

use folio_core::{User, UserId};
use tracing::debug;

use crate::store::EntityStore;

/// Repository for shopper accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    store: EntityStore,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(store: EntityStore) -> Self {
        UserRepository { store }
    }

    /// Creates a user with the next identifier.
    pub async fn create(&self, email: impl Into<String>, name: impl Into<String>) -> User {
        let mut records = self.store.write().await;

        let user = User {
            id: records.user_ids.next(),
            email: email.into(),
            name: name.into(),
        };
        debug!(user_id = user.id, email = %user.email, "Creating user");

        records.users.insert(user.id, user.clone());
        user
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: UserId) -> Option<User> {
        self.store.read().await.users.get(&id).cloned()
    }

    /// Lists users in ascending identifier order.
    pub async fn list(&self) -> Vec<User> {
        self.store.read().await.users.values().cloned().collect()
    }
}
