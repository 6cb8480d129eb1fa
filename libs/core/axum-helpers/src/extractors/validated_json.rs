//! JSON extractor with validation against router state.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::ValidationErrors;

/// Validation that may consult router state, e.g. a clock or configured limits.
///
/// Types that only need `validator::Validate` delegate to it:
///
/// ```ignore
/// impl<S> ValidateWith<S> for CreateUser {
///     fn validate_with(&self, _: &S) -> Result<(), ValidationErrors> {
///         self.validate()
///     }
/// }
/// ```
pub trait ValidateWith<S> {
    fn validate_with(&self, state: &S) -> Result<(), ValidationErrors>;
}

/// JSON extractor with automatic validation.
///
/// Malformed bodies are rejected with the JSON rejection's status. Constraint
/// violations are rejected with `400 Bad Request` and one message per
/// violated constraint.
///
/// # Example
/// ```ignore
/// async fn create_user(ValidatedJson(payload): ValidatedJson<CreateUser>) -> StatusCode {
///     StatusCode::NO_CONTENT
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + ValidateWith<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::JsonExtractorRejection(e).into_response())?;

        data.validate_with(state)
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
