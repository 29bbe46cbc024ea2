//! Route handlers for the REST gateway.

pub mod auth;
pub mod patients;

use api_shared::dto::HealthRes;
use api_shared::HealthService;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::Json;

use crate::error::ApiError;
use crate::state::AppState;
use chartview_core::constants::ACCESS_TOKEN_COOKIE;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST gateway
///
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

/// Read the access token for a cookie-authenticated route.
///
/// Absence is an immediate unauthorized failure; no refresh is attempted
/// server-side.
pub(crate) fn access_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookies| api_shared::auth::cookie_value(cookies, ACCESS_TOKEN_COOKIE))
        .ok_or_else(|| ApiError::Auth("missing access token".into()))
}
