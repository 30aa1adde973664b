//! Transport-agnostic endpoint contracts.
//!
//! Each endpoint validates its request, calls the service and maps the
//! outcome onto [`Reply`] or [`EndpointError`].

use core_config::pagination::PaginatorConfig;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::error::{EndpointError, UserError};
use crate::models::{User, UserFilters, UserUpdate};
use crate::pagination::{PageMeta, PageRequest};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const SUCCESS: &str = "success";
const USER_DOES_NOT_EXIST: &str = "user does not exist";

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub id: String,
}

/// Raw list query. `page` and `limit` stay strings until resolved.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetAllRequest {
    /// Case-insensitive substring of the first name
    pub first_name: Option<String>,
    /// Case-insensitive substring of the last name
    pub last_name: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

/// Partial update. Absent (or `null`) fields are left unchanged; present
/// names must not be empty.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRequest {
    #[serde(skip)]
    pub id: String,
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplyStatus {
    Ok,
    Created,
}

impl ReplyStatus {
    pub fn status_code(&self) -> u16 {
        match self {
            ReplyStatus::Ok => 200,
            ReplyStatus::Created => 201,
        }
    }
}

/// Successful endpoint outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: ReplyStatus,
    pub data: T,
    pub meta: Option<PageMeta>,
}

impl<T> Reply<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: ReplyStatus::Ok,
            data,
            meta: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: ReplyStatus::Created,
            data,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

pub type EndpointResult<T> = Result<Reply<T>, EndpointError>;

/// First validation message, fields in name order.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

fn invalid_input(errors: ValidationErrors) -> EndpointError {
    let message = validation_message(&errors);
    tracing::info!(error = %message, "Rejected invalid request");
    EndpointError::InvalidInput(message)
}

fn storage(err: UserError) -> EndpointError {
    tracing::error!(error = %err, "User store failure");
    EndpointError::Storage(err.to_string())
}

/// The five user endpoints
pub struct UserEndpoints<R: UserRepository> {
    service: UserService<R>,
    paginator: PaginatorConfig,
}

impl<R: UserRepository> UserEndpoints<R> {
    pub fn new(service: UserService<R>, paginator: PaginatorConfig) -> Self {
        Self { service, paginator }
    }

    pub async fn create(&self, request: CreateRequest) -> EndpointResult<User> {
        request.validate().map_err(invalid_input)?;

        let user = self
            .service
            .create(
                request.first_name,
                request.last_name,
                request.email,
                request.phone,
            )
            .await
            .map_err(storage)?;

        Ok(Reply::created(user))
    }

    pub async fn get(&self, request: GetRequest) -> EndpointResult<User> {
        match self.service.get(&request.id).await {
            Ok(user) => Ok(Reply::ok(user)),
            Err(err @ UserError::NotFound(_)) => Err(EndpointError::NotFound(err.to_string())),
            Err(err) => Err(storage(err)),
        }
    }

    /// Count first, then fetch the page described by the resolved pagination.
    pub async fn get_all(&self, request: GetAllRequest) -> EndpointResult<Vec<User>> {
        let pagination =
            PageRequest::parse(request.page.as_deref(), request.limit.as_deref())
                .resolve(&self.paginator)
                .map_err(|e| {
                    tracing::info!(error = %e, "Rejected pagination");
                    EndpointError::InvalidInput(e.to_string())
                })?;

        let filters = UserFilters {
            first_name: request.first_name,
            last_name: request.last_name,
        };

        let total = self.service.count(&filters).await.map_err(storage)?;
        let meta = pagination.meta(total);

        let users = self
            .service
            .get_all(&filters, pagination.offset(), pagination.limit)
            .await
            .map_err(storage)?;

        Ok(Reply::ok(users).with_meta(meta))
    }

    pub async fn update(&self, request: UpdateRequest) -> EndpointResult<&'static str> {
        request.validate().map_err(invalid_input)?;

        let update = UserUpdate {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
        };

        match self.service.update(&request.id, update).await {
            Ok(()) => Ok(Reply::ok(SUCCESS)),
            Err(UserError::NotFound(_)) => {
                Err(EndpointError::NotFound(USER_DOES_NOT_EXIST.to_string()))
            }
            Err(err) => Err(storage(err)),
        }
    }

    pub async fn delete(&self, request: DeleteRequest) -> EndpointResult<&'static str> {
        match self.service.delete(&request.id).await {
            Ok(()) => Ok(Reply::ok(SUCCESS)),
            Err(UserError::NotFound(_)) => {
                Err(EndpointError::NotFound(USER_DOES_NOT_EXIST.to_string()))
            }
            Err(err) => Err(storage(err)),
        }
    }
}
