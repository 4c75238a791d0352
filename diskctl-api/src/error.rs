//! Maps the Core's and the Store's error taxonomy onto HTTP status + JSON
//! body (§7): this is the one place status codes get decided, not scattered
//! through the handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

pub struct ApiErrorResponse(StatusCode, ApiError);

impl ApiErrorResponse {
    pub fn from_parts(status: StatusCode, error: ApiError) -> Self {
        Self(status, error)
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

impl From<diskctl_core::Error> for ApiErrorResponse {
    fn from(err: diskctl_core::Error) -> Self {
        use diskctl_core::Error::*;
        match err {
            NotFound(what) => ApiErrorResponse(StatusCode::BAD_REQUEST, ApiError::new("not_found", what)),
            Conflict(msg) => ApiErrorResponse(StatusCode::OK, ApiError::new("conflict", msg)),
            External(msg) => ApiErrorResponse(StatusCode::EXPECTATION_FAILED, ApiError::new("external_command_failed", msg)),
            Invariant(msg) => ApiErrorResponse(StatusCode::BAD_REQUEST, ApiError::new("invariant_violated", msg)),
            Database(e) => ApiErrorResponse(StatusCode::INTERNAL_SERVER_ERROR, ApiError::new("database_error", e.to_string())),
        }
    }
}

impl From<diskctl_store::Error> for ApiErrorResponse {
    fn from(err: diskctl_store::Error) -> Self {
        match err {
            diskctl_store::Error::NotFound { entity, id } => {
                ApiErrorResponse(StatusCode::NOT_FOUND, ApiError::new("not_found", format!("{entity} {id} not found")))
            }
            other => ApiErrorResponse(StatusCode::BAD_REQUEST, ApiError::new("invalid_request", other.to_string())),
        }
    }
}
