use axum::extract::{Path, rejection::PathRejection};

use crate::error::{AppError, AppResult};

/// Unwrap a numeric path segment, rejecting non-numbers and zero.
pub fn non_zero_id(path: Result<Path<i64>, PathRejection>, name: &str) -> AppResult<i64> {
    match path {
        Ok(Path(id)) if id != 0 => Ok(id),
        Ok(Path(_)) => Err(AppError::BadRequest(format!("{name} must not be zero"))),
        Err(rejection) => Err(AppError::BadRequest(format!(
            "{name} must be an integer: {}",
            rejection.body_text()
        ))),
    }
}
