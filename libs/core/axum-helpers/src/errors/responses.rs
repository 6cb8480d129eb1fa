//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "status": "INTERNAL_SERVER_ERROR",
        "error": "Internal Server Error",
        "message": "A database error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "status": "BAD_REQUEST",
        "message": "Method Argument Not Valid",
        "errors": [
            "A product must have brand.",
            "A product must have from 1 to 5 categories."
        ]
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid path parameter",
    content_type = "application/json",
    example = json!({
        "status": "BAD_REQUEST",
        "error": "Bad Request",
        "message": "getProductById.id: Id must be positive."
    })
)]
pub struct BadRequestPathResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "status": "NOT_FOUND",
        "error": "No such Product",
        "message": "Product with id = 1 not found."
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
