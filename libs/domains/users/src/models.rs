use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Assign an identity and timestamps to a new user.
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields present in `update`; the rest stay as they are.
    pub fn apply_update(&mut self, update: UserUpdate) {
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        self.updated_at = Utc::now();
    }
}

/// A user that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
    }
}

/// Case-insensitive substring filters, AND-ed together.
///
/// An empty value is the same as no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilters {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserFilters {
    pub fn first_name_filter(&self) -> Option<&str> {
        non_empty(&self.first_name)
    }

    pub fn last_name_filter(&self) -> Option<&str> {
        non_empty(&self.last_name)
    }

    /// Whether `user` passes every active filter.
    pub fn matches(&self, user: &User) -> bool {
        let contains = |value: &str, needle: &str| {
            value.to_lowercase().contains(&needle.to_lowercase())
        };

        self.first_name_filter()
            .is_none_or(|needle| contains(&user.first_name, needle))
            && self
                .last_name_filter()
                .is_none_or(|needle| contains(&user.last_name, needle))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
