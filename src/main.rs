use std::sync::Arc;

use chartview_core::{
    config::{cookie_max_age_from_env_value, CoreConfig},
    constants::DEFAULT_REST_ADDR,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Chartview dashboard gateway
///
/// Resolves configuration from the environment once, then starts the REST
/// gateway that fronts the remote EHR API.
///
/// # Environment Variables
/// - `CHARTVIEW_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `CHARTVIEW_EHR_BASE_URL`: Base URL of the remote EHR API (required)
/// - `CHARTVIEW_EHR_CLIENT_ID`: OAuth client id used for token grants (required)
/// - `CHARTVIEW_ACCESS_COOKIE_MAX_AGE`: Access cookie lifetime in seconds (optional)
/// - `CHARTVIEW_REFRESH_COOKIE_MAX_AGE`: Refresh cookie lifetime in seconds (optional)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration resolution or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chartview=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CHARTVIEW_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let ehr_base_url = std::env::var("CHARTVIEW_EHR_BASE_URL")
        .map_err(|_| anyhow::anyhow!("CHARTVIEW_EHR_BASE_URL must be set"))?;
    let client_id = std::env::var("CHARTVIEW_EHR_CLIENT_ID")
        .map_err(|_| anyhow::anyhow!("CHARTVIEW_EHR_CLIENT_ID must be set"))?;
    let access_max_age =
        cookie_max_age_from_env_value(std::env::var("CHARTVIEW_ACCESS_COOKIE_MAX_AGE").ok())?;
    let refresh_max_age =
        cookie_max_age_from_env_value(std::env::var("CHARTVIEW_REFRESH_COOKIE_MAX_AGE").ok())?;

    let cfg = Arc::new(CoreConfig::new(
        ehr_base_url,
        client_id,
        access_max_age,
        refresh_max_age,
    )?);

    tracing::info!("++ Starting Chartview REST gateway on {}", addr);

    api_rest::serve(&addr, cfg).await
}
