use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::SqlErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::{
    models::Role,
    response::{ErrorBody, ValidationErrorBody},
};

/// A single rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Access Denied")]
    Unauthenticated,

    #[error("Invalid Token")]
    InvalidToken,

    #[error("Access denied. Only {0}s can perform this action.")]
    Forbidden(Role),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("At least one field must be provided to update.")]
    NoFieldsProvided,

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Request timed out.")]
    Timeout,

    #[error("Database error")]
    Store(#[from] sqlx::Error),

    #[error("ORM error")]
    Orm(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken | AppError::Forbidden(_) | AppError::InvalidCredentials => {
                StatusCode::FORBIDDEN
            }
            AppError::Validation(_) | AppError::NoFieldsProvided => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Store(_) | AppError::Orm(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Store(err) => err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation()),
            AppError::Orm(err) => matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))),
            _ => false,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            AppError::Store(err) => err
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation()),
            AppError::Orm(err) => matches!(
                err.sql_err(),
                Some(SqlErr::ForeignKeyConstraintViolation(_))
            ),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            AppError::Validation(errors) => {
                (status, axum::Json(ValidationErrorBody { errors })).into_response()
            }
            AppError::Store(ref err) => server_error(status, err),
            AppError::Orm(ref err) => server_error(status, err),
            AppError::Internal(ref err) => server_error(status, err),
            other => (status, axum::Json(ErrorBody::new(other.to_string()))).into_response(),
        }
    }
}

// Store and internal failures are logged with their cause but never leak it.
fn server_error(status: StatusCode, cause: &dyn std::fmt::Display) -> Response {
    tracing::error!(error = %cause, "request failed");
    (status, axum::Json(ErrorBody::new("Server error."))).into_response()
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_token_is_401_access_denied() {
        let (status, json) = body_json(AppError::Unauthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"], "Access Denied");
    }

    #[tokio::test]
    async fn invalid_token_is_403() {
        let (status, json) = body_json(AppError::InvalidToken).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"], "Invalid Token");
    }

    #[tokio::test]
    async fn forbidden_names_the_required_role() {
        let (status, json) = body_json(AppError::Forbidden(Role::Secretary)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            json["error"],
            "Access denied. Only Secretarys can perform this action."
        );
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let (status, json) = body_json(AppError::Validation(vec![
            FieldError::new("email", "must be a valid email address"),
            FieldError::new("password", "must be at least 6 characters"),
        ]))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = json["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "email");
        assert_eq!(errors[1]["field"], "password");
    }

    #[tokio::test]
    async fn not_found_names_the_resource() {
        let (status, json) = body_json(AppError::NotFound("Patient")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Patient not found.");
    }

    #[tokio::test]
    async fn timeout_maps_to_504() {
        let (status, json) = body_json(AppError::Timeout).await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(json["error"], "Request timed out.");
    }

    #[tokio::test]
    async fn store_failures_hide_details() {
        let (status, json) = body_json(AppError::Store(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Server error.");

        let (_, json) = body_json(AppError::Internal(anyhow::anyhow!("secret detail"))).await;
        assert_eq!(json["error"], "Server error.");
    }

    #[test]
    fn plain_errors_are_not_constraint_violations() {
        assert!(!AppError::Store(sqlx::Error::RowNotFound).is_unique_violation());
        assert!(!AppError::Timeout.is_foreign_key_violation());
    }
}
