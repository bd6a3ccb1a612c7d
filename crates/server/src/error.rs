use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use services::services::{auth::AuthError, monthly_tasks::MonthlyTasksError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("authentication required")]
    Unauthorized,
    #[error("permission denied")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<MonthlyTasksError> for ApiError {
    fn from(err: MonthlyTasksError) -> Self {
        match err {
            MonthlyTasksError::GardenNotFound => ApiError::NotFound("garden"),
            MonthlyTasksError::InvalidMonth => ApiError::Validation(err.to_string()),
            MonthlyTasksError::Database(e) => ApiError::Database(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized | ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self {
            ApiError::Database(sqlx::Error::RowNotFound) => "not found".to_string(),
            ApiError::Database(e) => {
                tracing::error!(error = %e, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}
