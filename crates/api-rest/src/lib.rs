//! # API REST
//!
//! REST gateway for the Chartview dashboard.
//!
//! Handles:
//! - HTTP endpoints with axum (`/login`, `/logout`, `/patients`, `/health`)
//! - Token cookie persistence for the browser session
//! - Proxying to the remote EHR API through the resource mapper
//! - OpenAPI/Swagger documentation
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod gateway;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use chartview_core::CoreConfig;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::dto::{
    ErrorBody, HealthRes, LoginRequest, MessageRes, PatientDetail, UpdatePatientRequest,
    UpdatePatientRes,
};
pub use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health,
        routes::auth::login,
        routes::auth::logout,
        routes::patients::list_patients,
        routes::patients::get_patient,
        routes::patients::update_patient,
    ),
    components(schemas(
        HealthRes,
        ErrorBody,
        MessageRes,
        LoginRequest,
        PatientDetail,
        UpdatePatientRequest,
        UpdatePatientRes,
    ))
)]
struct ApiDoc;

/// Build the gateway router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/patients", get(routes::patients::list_patients))
        .route(
            "/patients/:id",
            get(routes::patients::get_patient).put(routes::patients::update_patient),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the gateway until the process exits.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while
/// running.
pub async fn serve(addr: &str, cfg: Arc<CoreConfig>) -> anyhow::Result<()> {
    let state = AppState::new(cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
