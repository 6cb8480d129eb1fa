pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// JSON error envelope returned by every failing endpoint.
///
/// ```json
/// {
///   "status": "BAD_REQUEST",
///   "message": "Method Argument Not Valid",
///   "errors": ["A product must have brand."]
/// }
/// ```
///
/// `error` carries a short reason phrase and is omitted when absent;
/// `errors` lists every violated constraint and is omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status name, e.g. `NOT_FOUND`
    pub status: String,
    /// Short reason phrase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable message
    pub message: String,
    /// One message per violated constraint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status_name(status),
            error: None,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

/// `StatusCode::NOT_FOUND` -> `"NOT_FOUND"`
pub fn status_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
}

/// Reason phrase for a status, e.g. `"Bad Request"`.
fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// Serializes the envelope. A serialization failure is logged and the
/// response degrades to an empty body with the intended status.
pub fn render(status: StatusCode, body: &ErrorResponse) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Couldn't write error response");
            status.into_response()
        }
    }
}

/// Flattens validator output into one message per violated constraint,
/// sorted so responses are stable across runs.
///
/// A constraint without a custom message is reported as `"<field>: <code>"`.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages
}

fn collect_messages(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{}: {}", field, e.code),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, out),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, out);
                }
            }
        }
    }
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// Request body violated one or more constraints
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Malformed or out-of-range request input, e.g. a path parameter
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// `reason` becomes the envelope's `error` field
    #[error("{reason}: {message}")]
    NotFound { reason: String, message: String },

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(validation_messages(&errors))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Well-formed JSON that does not fit the target type is still a bad request
            AppError::JsonExtractorRejection(JsonRejection::JsonDataError(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::JsonExtractorRejection(e) => e.status(),
            AppError::Database(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(errors) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    violations = errors.len(),
                    "Validation error: {:?}",
                    errors
                );
                ErrorResponse::new(status, ErrorCode::ValidationError.default_message())
                    .with_errors(errors)
            }
            AppError::BadRequest(msg) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidPathParameter.code(),
                    "Bad request: {}",
                    msg
                );
                ErrorResponse::new(status, msg).with_error(reason_phrase(status))
            }
            AppError::NotFound { reason, message } => {
                tracing::info!(
                    error_code = ErrorCode::NotFound.code(),
                    "Not found: {}",
                    message
                );
                ErrorResponse::new(status, message).with_error(reason)
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(
                    error_code = ErrorCode::JsonExtraction.code(),
                    "JSON extraction error: {:?}",
                    e
                );
                ErrorResponse::new(status, e.body_text()).with_error(reason_phrase(status))
            }
            AppError::Database(e) => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    "Database error: {:?}",
                    e
                );
                ErrorResponse::new(status, ErrorCode::DatabaseError.default_message())
                    .with_error(reason_phrase(status))
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(
                    error_code = ErrorCode::InternalError.code(),
                    "Internal server error: {}",
                    msg
                );
                ErrorResponse::new(status, ErrorCode::InternalError.default_message())
                    .with_error(reason_phrase(status))
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(
                    error_code = ErrorCode::ServiceUnavailable.code(),
                    "Service unavailable: {}",
                    msg
                );
                ErrorResponse::new(status, msg).with_error(reason_phrase(status))
            }
        };

        render(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::borrow::Cow;
    use validator::ValidationError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_name() {
        assert_eq!(status_name(StatusCode::BAD_REQUEST), "BAD_REQUEST");
        assert_eq!(status_name(StatusCode::NOT_FOUND), "NOT_FOUND");
        assert_eq!(
            status_name(StatusCode::UNSUPPORTED_MEDIA_TYPE),
            "UNSUPPORTED_MEDIA_TYPE"
        );
        assert_eq!(
            status_name(StatusCode::INTERNAL_SERVER_ERROR),
            "INTERNAL_SERVER_ERROR"
        );
    }

    #[test]
    fn test_validation_messages_sorted_with_code_fallback() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("length").with_message(Cow::Borrowed("Zeta message")),
        );
        errors.add("brand", ValidationError::new("required"));

        let messages = validation_messages(&errors);
        assert_eq!(messages, vec!["Zeta message", "brand: required"]);
    }

    #[tokio::test]
    async fn test_validation_envelope() {
        let response =
            AppError::Validation(vec!["A product must have brand.".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_json(response).await;
        assert_eq!(
            body,
            serde_json::json!({
                "status": "BAD_REQUEST",
                "message": "Method Argument Not Valid",
                "errors": ["A product must have brand."]
            })
        );
    }

    #[tokio::test]
    async fn test_not_found_envelope_carries_reason() {
        let response = AppError::NotFound {
            reason: "No such Widget".to_string(),
            message: "Widget with id = 3 not found.".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["status"], "NOT_FOUND");
        assert_eq!(body["error"], "No such Widget");
        assert_eq!(body["message"], "Widget with id = 3 not found.");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_bad_request_envelope() {
        let response = AppError::BadRequest("getWidget.id: Id must be positive.".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Bad Request");
        assert_eq!(body["message"], "getWidget.id: Id must be positive.");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let response =
            AppError::Database(DbErr::Custom("password authentication failed".to_string()))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["message"], "A database error occurred");
        assert!(!body.to_string().contains("password"));
    }

    #[test]
    fn test_from_validation_errors() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "categories",
            ValidationError::new("length").with_message(Cow::Borrowed("Too many")),
        );

        match AppError::from(errors) {
            AppError::Validation(messages) => assert_eq!(messages, vec!["Too many"]),
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
