//! User service.

use common::{User, UserId};
use entity_store::{EntityRepository, InMemoryUserStore};

use crate::error::DomainError;

/// Service for registering and looking up users.
#[derive(Debug, Clone)]
pub struct UserService<S = InMemoryUserStore> {
    store: S,
}

impl<S: EntityRepository<User>> UserService<S> {
    /// Creates a user service over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a new user and returns it with its assigned id.
    #[tracing::instrument(skip(self))]
    pub async fn tx_create(&self, user: User) -> Result<User, DomainError> {
        let user = self.store.tx_create(user).await?;

        metrics::counter!("users_created_total").increment(1);
        tracing::info!(user_id = %user.id, "user created");

        Ok(user)
    }

    /// Retrieves a user by id.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        Ok(self.store.get(id).await?)
    }

    /// Lists every user.
    pub async fn list_users(&self) -> Vec<User> {
        self.store.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;

    #[tokio::test]
    async fn create_then_get() {
        let service = UserService::new(InMemoryUserStore::new());

        let created = service.tx_create(User::new("ana")).await.unwrap();
        assert_eq!(created.id, UserId::new(1));

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let service = UserService::new(InMemoryUserStore::new());

        let err = service.get(UserId::new(9)).await.unwrap_err();
        assert_eq!(err, DomainError::Model(ModelError::NotFound));
    }

    #[tokio::test]
    async fn list_users_returns_everyone() {
        let service = UserService::new(InMemoryUserStore::new());
        service.tx_create(User::new("ana")).await.unwrap();
        service.tx_create(User::new("bo")).await.unwrap();

        let mut names: Vec<_> = service
            .list_users()
            .await
            .into_iter()
            .map(|u| u.name)
            .collect();
        names.sort();
        assert_eq!(names, ["ana", "bo"]);
    }
}
