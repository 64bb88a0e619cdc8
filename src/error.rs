use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid request body: {0}")]
    Decode(#[from] JsonRejection),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error in {op}")]
    Database {
        op: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Decode(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database { source, .. } => match source.as_database_error() {
                Some(db) if db.is_unique_violation() => StatusCode::CONFLICT,
                Some(db) if db.is_foreign_key_violation() => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::OrmError(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Server-side failures stay opaque.
    fn public_message(&self, status: StatusCode) -> String {
        match self {
            AppError::Database { .. } if status == StatusCode::CONFLICT => {
                "cart item already exists for this user and item".to_string()
            }
            AppError::Database { .. } if status == StatusCode::BAD_REQUEST => {
                "item does not exist".to_string()
            }
            _ if status.is_server_error() => "Internal Server Error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        (status, self.public_message(status)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Attach the failing operation to a raw `sqlx` error.
pub trait DbResultExt<T> {
    fn db_op<F>(self, op: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn db_op<F>(self, op: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| AppError::Database { op: op(), source })
    }
}
