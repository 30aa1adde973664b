use axum_helpers::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user '{0}' not found")]
    NotFound(String),

    /// Constraint violation reported by the store
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Storage(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<DbErr> for UserError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => UserError::Conflict(msg),
            _ => UserError::Storage(err.to_string()),
        }
    }
}

/// Failure kinds reported by the endpoint layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Storage(String),
}

impl EndpointError {
    pub fn status_code(&self) -> u16 {
        match self {
            EndpointError::InvalidInput(_) => 400,
            EndpointError::NotFound(_) => 404,
            EndpointError::Storage(_) => 500,
        }
    }
}

impl From<EndpointError> for AppError {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::InvalidInput(msg) => AppError::BadRequest(msg),
            EndpointError::NotFound(msg) => AppError::NotFound(msg),
            EndpointError::Storage(msg) => AppError::InternalServerError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_err_maps_to_storage() {
        let err: UserError = DbErr::Custom("connection refused".to_string()).into();
        match err {
            UserError::Storage(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = UserError::NotFound("0190".to_string());
        assert_eq!(err.to_string(), "user '0190' not found");
    }

    #[test]
    fn test_endpoint_error_status_codes() {
        assert_eq!(EndpointError::InvalidInput(String::new()).status_code(), 400);
        assert_eq!(EndpointError::NotFound(String::new()).status_code(), 404);
        assert_eq!(EndpointError::Storage(String::new()).status_code(), 500);
    }
}
