use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with id = {0} not found.")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound {
                reason: "No such Product".to_string(),
                message: ProductError::NotFound(id).to_string(),
            },
            ProductError::Database(msg) | ProductError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        ProductError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_not_found_maps_to_reason_and_message() {
        match AppError::from(ProductError::NotFound(1)) {
            AppError::NotFound { reason, message } => {
                assert_eq!(reason, "No such Product");
                assert_eq!(message, "Product with id = 1 not found.");
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_database_error_is_internal() {
        let response = ProductError::from(DbErr::Custom("deadlock".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
