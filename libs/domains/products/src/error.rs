use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i64),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidArgument(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Operation '{0}' is not supported by the configured store")]
    Unsupported(&'static str),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(errors) => AppError::ValidationError(errors),
            ProductError::InvalidArgument(msg) => AppError::BadRequest(msg),
            ProductError::Conflict(msg) => AppError::Conflict(msg),
            ProductError::Unsupported(op) => AppError::NotImplemented(format!(
                "The configured product store does not support '{}'",
                op
            )),
            ProductError::Backend(msg) => AppError::BadGateway(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
