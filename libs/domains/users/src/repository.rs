use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserFilters, UserUpdate};

/// Repository trait for User persistence
///
/// Identities are taken as strings; one that does not parse as a UUID can
/// never match a record and yields `UserError::NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user, assigning its identity and timestamps
    async fn create(&self, user: NewUser) -> UserResult<User>;

    async fn get(&self, id: &str) -> UserResult<User>;

    /// Users matching `filters`, newest first, bounded by offset/limit
    async fn get_all(&self, filters: &UserFilters, offset: u64, limit: u64)
    -> UserResult<Vec<User>>;

    /// Number of users matching `filters`, with the same predicates as `get_all`
    async fn count(&self, filters: &UserFilters) -> UserResult<u64>;

    /// Write only the supplied fields
    async fn update(&self, id: &str, update: UserUpdate) -> UserResult<()>;

    async fn delete(&self, id: &str) -> UserResult<()>;
}

pub(crate) fn parse_id(id: &str) -> UserResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| UserError::NotFound(id.to_string()))
}

/// In-memory implementation of UserRepository (for local runs and tests)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let user = User::new(input);
        self.users.write().await.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get(&self, id: &str) -> UserResult<User> {
        let uuid = parse_id(id)?;
        self.users
            .read()
            .await
            .get(&uuid)
            .cloned()
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn get_all(
        &self,
        filters: &UserFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| filters.matches(u))
            .cloned()
            .collect();

        // Newest first, id breaks ties
        result.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(result.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, filters: &UserFilters) -> UserResult<u64> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| filters.matches(u)).count() as u64)
    }

    async fn update(&self, id: &str, update: UserUpdate) -> UserResult<()> {
        let uuid = parse_id(id)?;
        let mut users = self.users.write().await;

        let user = users
            .get_mut(&uuid)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        user.apply_update(update);

        tracing::info!(user_id = %uuid, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: &str) -> UserResult<()> {
        let uuid = parse_id(id)?;

        if self.users.write().await.remove(&uuid).is_some() {
            tracing::info!(user_id = %uuid, "Deleted user");
            Ok(())
        } else {
            Err(UserError::NotFound(id.to_string()))
        }
    }
}
