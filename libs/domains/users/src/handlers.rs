use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{AppError, ErrorEnvelope, JsonBody};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use crate::endpoints::{
    CreateRequest, DeleteRequest, GetAllRequest, GetRequest, Reply, ReplyStatus, UpdateRequest,
    UserEndpoints,
};
use crate::models::User;
use crate::pagination::PageMeta;
use crate::repository::UserRepository;

pub const TAG: &str = "Users";

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(schemas(User, CreateRequest, UpdateRequest, PageMeta, ErrorEnvelope)),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Success body. `status` repeats the HTTP status code.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Envelope<T> {
    pub status: u16,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

fn http_status(status: ReplyStatus) -> StatusCode {
    match status {
        ReplyStatus::Ok => StatusCode::OK,
        ReplyStatus::Created => StatusCode::CREATED,
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        let status = http_status(self.status);
        let body = Envelope {
            status: status.as_u16(),
            data: self.data,
            meta: self.meta,
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Reply<T>, AppError>;
type SharedEndpoints<R> = State<Arc<UserEndpoints<R>>>;

/// Create the users router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(endpoints: UserEndpoints<R>) -> Router {
    let shared_endpoints = Arc::new(endpoints);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(shared_endpoints)
}

/// List users, newest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(GetAllRequest),
    responses(
        (status = 200, description = "One page of users", body = Envelope<Vec<User>>),
        (status = 400, description = "Invalid pagination", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
async fn list_users<R: UserRepository>(
    State(endpoints): SharedEndpoints<R>,
    query: Result<Query<GetAllRequest>, QueryRejection>,
) -> ApiResult<Vec<User>> {
    let Query(request) = query.map_err(|rejection| {
        AppError::BadRequest(format!(
            "invalid request format: '{}'",
            rejection.body_text()
        ))
    })?;

    Ok(endpoints.get_all(request).await?)
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateRequest,
    responses(
        (status = 201, description = "User created", body = Envelope<User>),
        (status = 400, description = "Missing name or malformed body", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
async fn create_user<R: UserRepository>(
    State(endpoints): SharedEndpoints<R>,
    JsonBody(request): JsonBody<CreateRequest>,
) -> ApiResult<User> {
    Ok(endpoints.create(request).await?)
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = Envelope<User>),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
async fn get_user<R: UserRepository>(
    State(endpoints): SharedEndpoints<R>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    Ok(endpoints.get(GetRequest { id }).await?)
}

/// Update the supplied fields of a user
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "User updated", body = Envelope<String>),
        (status = 400, description = "Empty name or malformed body", body = ErrorEnvelope),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
async fn update_user<R: UserRepository>(
    State(endpoints): SharedEndpoints<R>,
    Path(id): Path<String>,
    JsonBody(mut request): JsonBody<UpdateRequest>,
) -> ApiResult<&'static str> {
    request.id = id;
    Ok(endpoints.update(request).await?)
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = Envelope<String>),
        (status = 404, description = "No such user", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    )
)]
async fn delete_user<R: UserRepository>(
    State(endpoints): SharedEndpoints<R>,
    Path(id): Path<String>,
) -> ApiResult<&'static str> {
    Ok(endpoints.delete(DeleteRequest { id }).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Pagination;

    #[test]
    fn test_envelope_omits_absent_meta() {
        let json = serde_json::to_value(Envelope {
            status: 200,
            data: "success",
            meta: None,
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({ "status": 200, "data": "success" }));
    }

    #[test]
    fn test_envelope_includes_meta_for_lists() {
        let meta = Pagination { page: 2, limit: 5 }.meta(12);
        let json = serde_json::to_value(Envelope {
            status: 200,
            data: Vec::<User>::new(),
            meta: Some(meta),
        })
        .unwrap();

        assert_eq!(json["meta"]["offset"], 5);
        assert_eq!(json["meta"]["total_pages"], 3);
    }

    #[test]
    fn test_reply_status_maps_to_http_status() {
        assert_eq!(http_status(ReplyStatus::Ok), StatusCode::OK);
        assert_eq!(http_status(ReplyStatus::Created), StatusCode::CREATED);
        assert_eq!(Reply::created(()).into_response().status(), StatusCode::CREATED);
    }

    #[test]
    fn test_openapi_lists_user_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/{id}".to_string()));
        assert!(paths.contains(&String::new()));
    }
}
