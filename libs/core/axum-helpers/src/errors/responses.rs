//! Reusable OpenAPI response types for the error envelope.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request",
    content_type = "application/json",
    example = json!({
        "code": 1005,
        "error": "BAD_REQUEST",
        "message": "User 0199a3c2-5a4e-7d1b-9f3e-2b8c6d1e4f70 does not exist"
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Request validation failed",
        "details": {
            "name": [{
                "code": "length",
                "message": null,
                "params": {"min": 1, "max": 200, "value": ""}
            }]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid UUID",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_UUID",
        "message": "Invalid UUID: abc"
    })
)]
pub struct BadRequestUuidResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Book 0199a3c2-5a4e-7d1b-9f3e-2b8c6d1e4f70 not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Item already swapped",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "NOT_AVAILABLE",
        "message": "Book 0199a3c2-5a4e-7d1b-9f3e-2b8c6d1e4f70 is not available"
    })
)]
pub struct NotAvailableResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unprocessable JSON body",
    content_type = "application/json",
    example = json!({
        "code": 1003,
        "error": "INVALID_JSON",
        "message": "Failed to deserialize the JSON body into the target type"
    })
)]
pub struct InvalidJsonResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 1500,
        "error": "INTERNAL_ERROR",
        "message": "An internal server error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Downstream service failed; the local change was kept",
    content_type = "application/json",
    example = json!({
        "code": 1502,
        "error": "UPSTREAM_FAILURE",
        "message": "Posting service rejected the order with status 503"
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);
