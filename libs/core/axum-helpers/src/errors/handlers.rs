use axum::{http::StatusCode, response::Response};

use super::{render, ErrorCode, ErrorResponse};

/// Fallback handler for unmatched routes.
pub async fn not_found() -> Response {
    let body = ErrorResponse::new(StatusCode::NOT_FOUND, ErrorCode::NotFound.default_message())
        .with_error("Not Found");

    render(StatusCode::NOT_FOUND, &body)
}
