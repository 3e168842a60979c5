use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use service::errors::ServiceError;

/// JSON error body: `{"error": ..., "detail": ..., "errors": [...]}` with
/// `detail` and `errors` omitted when empty.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail, errors: None }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Bad Request", Some(msg))
            }
            ServiceError::InvalidHtml(result) => JsonApiError {
                status: StatusCode::BAD_REQUEST,
                error: "Invalid HTML".into(),
                detail: None,
                errors: Some(result.errors),
            },
            ServiceError::Conflict(msg) => {
                JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg))
            }
            ServiceError::NotFound(msg) => {
                JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg))
            }
            ServiceError::Unavailable(msg) => {
                error!(error = %msg, "validation collaborator unavailable");
                JsonApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", Some(msg))
            }
            ServiceError::Db(msg) => {
                error!(error = %msg, "persistence failure");
                JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    Some("service temporarily unavailable".into()),
                )
            }
        }
    }
}
