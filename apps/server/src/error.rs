use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use livemap_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save order to database";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    /// Storage failed while saving an order; the cause is logged, not returned.
    #[error("Failed to save order to database")]
    SaveFailed(CoreError),
    #[error("Internal server error")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(ErrorBody {
        error: message.into(),
    });
    (status, body).into_response()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => match e {
                CoreError::Validation(v) => (StatusCode::BAD_REQUEST, v.to_string()),
                CoreError::Database(DatabaseError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, "Order not found".to_string())
                }
                _ => {
                    tracing::error!("Request failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERROR_MESSAGE.to_string(),
                    )
                }
            },
            ApiError::SaveFailed(cause) => {
                tracing::error!("Error inserting order: {}", cause);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::Internal(detail) => {
                tracing::error!("Unexpected error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };
        error_response(status, msg)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
