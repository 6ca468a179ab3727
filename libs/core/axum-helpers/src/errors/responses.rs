//! Reusable OpenAPI response types for consistent API documentation.

#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "status": 500,
        "message": "An internal server error occurred",
        "data": null
    })
)]
pub struct InternalServerErrorResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "status": 400,
        "message": "Validation failed: title: length",
        "data": null
    })
)]
pub struct BadRequestValidationResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "status": 400,
        "message": "Invalid UUID format",
        "data": null
    })
)]
pub struct BadRequestUuidResponse;

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "status": 404,
        "message": "Resource not found",
        "data": null
    })
)]
pub struct NotFoundResponse;
