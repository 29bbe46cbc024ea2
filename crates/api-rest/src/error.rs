//! HTTP mapping for the gateway error taxonomy.

use api_shared::dto::ErrorBody;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chartview_core::DashboardError;
use fhir::FhirError;

/// Route-level error. Every failing handler funnels through this type so the
/// status mapping and the sanitized `{"error": ...}` envelope live in one
/// place.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Auth(String),
    NotFound(String),
    Remote { status: u16, message: String },
    Unknown(String),
}

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Validation(msg) => ApiError::Validation(msg),
            DashboardError::Auth(msg) => ApiError::Auth(msg),
            DashboardError::NotFound(msg) => ApiError::NotFound(msg),
            DashboardError::Remote { status, message } => ApiError::Remote { status, message },
            DashboardError::Configuration(msg) | DashboardError::Unknown(msg) => {
                ApiError::Unknown(msg)
            }
        }
    }
}

impl From<FhirError> for ApiError {
    fn from(err: FhirError) -> Self {
        match err {
            FhirError::InvalidInput(msg) => ApiError::Validation(msg),
            FhirError::Translation(msg) => ApiError::Unknown(msg),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Unknown(format!("remote call failed: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Remote { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            ),
            ApiError::Unknown(detail) => {
                // Internal detail stays in the server log; the caller gets a
                // generic message.
                tracing::error!("unhandled gateway error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
