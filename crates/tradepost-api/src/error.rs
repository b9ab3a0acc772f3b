// Client-facing error rendering
// Every variant maps to one fixed, non-leaking message and status code.
// Internal detail is logged at the point of failure, never serialized.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use tradepost_contracts::{ErrorResponse, ValidationErrors};

#[derive(Debug)]
pub enum ApiError {
    /// 422 with a field -> message map
    Validation(ValidationErrors),
    /// 400
    BadRequest(&'static str),
    /// 401
    Unauthorized(&'static str),
    /// 404
    NotFound(&'static str),
    /// 409
    Conflict(&'static str),
    /// 500, always the same generic message
    Internal,
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::fields(errors),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::message(msg)),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorResponse::message(msg)),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::message(msg)),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, ErrorResponse::message(msg)),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::message(
                    "the server encountered a problem and could not process your request",
                ),
            ),
        };

        (status, Json(body)).into_response()
    }
}
