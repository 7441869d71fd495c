use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::services::{cart::CartError, orders::OrderError};
use thiserror::Error;
use tracing::error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(sqlx::Error::RowNotFound) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Order(OrderError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Order(OrderError::EmptyCart | OrderError::MissingContactField(_)) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self);
        }
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
