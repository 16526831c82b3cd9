use aide::OperationOutput;
use axum::{http::StatusCode, response::IntoResponse, Json};
use schemars::JsonSchema;
use serde_json::json;

/// Represent errors in the application
///
/// All `ServiceError`s can be transformed to http errors.
#[derive(Debug, Clone, JsonSchema)]
pub enum ServiceError {
    ValidationError(String),
    PayloadTooLarge(String),
    InternalServerError(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::ValidationError(cause) => write!(f, "validation failed: {cause}"),
            ServiceError::PayloadTooLarge(cause) => write!(f, "payload too large: {cause}"),
            ServiceError::InternalServerError(cause) => write!(f, "internal error: {cause}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Helper for `ServiceError` result
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        ServiceError::InternalServerError(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for ServiceError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        ServiceError::InternalServerError(format!("migration failed: {error}"))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(error: std::io::Error) -> Self {
        ServiceError::InternalServerError(error.to_string())
    }
}

impl OperationOutput for ServiceError {
    type Inner = String;
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServiceError::ValidationError(ref cause) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "Unprocessable entity",
                    "cause": cause,
                })),
            ),
            ServiceError::PayloadTooLarge(ref cause) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({
                    "error": "Payload too large",
                    "cause": cause,
                })),
            ),
            ServiceError::InternalServerError(ref cause) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "cause": cause,
                })),
            ),
        }
        .into_response()
    }
}
