//! Positive integer path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use std::marker::PhantomData;

/// Names the operation a path parameter belongs to.
///
/// The name prefixes rejection messages, e.g. `getProductById.id: Id must be positive.`
pub trait PathOperation {
    const NAME: &'static str;
}

/// Extractor for a strictly positive `i32` path parameter.
///
/// Rejects with `400 Bad Request` before the handler runs when the segment is
/// not an integer or is `<= 0`, so handlers never observe such ids.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::{PathOperation, PositiveIdPath};
///
/// struct GetOrder;
/// impl PathOperation for GetOrder {
///     const NAME: &'static str = "getOrder";
/// }
///
/// async fn get_order(PositiveIdPath(id, _): PositiveIdPath<GetOrder>) -> String {
///     format!("Order {}", id)
/// }
/// ```
pub struct PositiveIdPath<O>(pub i32, pub PhantomData<fn() -> O>);

impl<O> PositiveIdPath<O> {
    pub fn into_inner(self) -> i32 {
        self.0
    }
}

impl<O: PathOperation> PositiveIdPath<O> {
    /// Parses a raw path segment with the same rules the extractor applies.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let id: i32 = raw.trim().parse().map_err(|_| {
            AppError::BadRequest(format!(
                "{}.id: Failed to convert value '{}' to required type 'Integer'.",
                O::NAME,
                raw
            ))
        })?;

        if id <= 0 {
            return Err(AppError::BadRequest(format!(
                "{}.id: Id must be positive.",
                O::NAME
            )));
        }

        Ok(PositiveIdPath(id, PhantomData))
    }
}

impl<O, S> FromRequestParts<S> for PositiveIdPath<O>
where
    O: PathOperation,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Self::parse(&raw).map_err(|e| e.into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FetchThing;
    impl PathOperation for FetchThing {
        const NAME: &'static str = "fetchThing";
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::BadRequest(message) => message,
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_accepts_positive_id() {
        let path = PositiveIdPath::<FetchThing>::parse("42").unwrap();
        assert_eq!(path.into_inner(), 42);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        for raw in ["0", "-1", "-2147483648"] {
            let err = PositiveIdPath::<FetchThing>::parse(raw).err().unwrap();
            assert_eq!(message(err), "fetchThing.id: Id must be positive.");
        }
    }

    #[test]
    fn test_rejects_non_numeric() {
        let err = PositiveIdPath::<FetchThing>::parse("a").err().unwrap();
        assert_eq!(
            message(err),
            "fetchThing.id: Failed to convert value 'a' to required type 'Integer'."
        );
    }

    #[test]
    fn test_rejects_overflow() {
        assert!(PositiveIdPath::<FetchThing>::parse("2147483648").is_err());
    }
}
