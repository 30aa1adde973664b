use std::sync::Arc;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{NewUser, User, UserFilters, UserUpdate};
use crate::repository::UserRepository;

/// Service layer for User operations
///
/// Stateless apart from the shared repository handle.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Build a [`NewUser`] from raw fields and store it
    #[instrument(skip(self, email, phone))]
    pub async fn create(
        &self,
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> UserResult<User> {
        let user = NewUser {
            first_name,
            last_name,
            email,
            phone,
        };
        self.repository.create(user).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> UserResult<User> {
        self.repository.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_all(
        &self,
        filters: &UserFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        self.repository.get_all(filters, offset, limit).await
    }

    #[instrument(skip(self))]
    pub async fn count(&self, filters: &UserFilters) -> UserResult<u64> {
        self.repository.count(filters).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: UserUpdate) -> UserResult<()> {
        self.repository.update(id, update).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> UserResult<()> {
        self.repository.delete(id).await
    }
}
