//! Shared application state for the REST gateway.

use std::sync::Arc;
use std::time::Duration;

use chartview_core::{CoreConfig, DashboardError, DashboardResult};
use session::CookiePolicy;

/// HTTP client timeout for calls to the remote EHR API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state for the REST gateway
///
/// Contains shared state that needs to be accessible to all request handlers:
/// the startup configuration and the outbound HTTP client for the remote EHR
/// API.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build the state, constructing the outbound HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Configuration`] if the client cannot be
    /// constructed.
    pub fn new(cfg: Arc<CoreConfig>) -> DashboardResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                DashboardError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self { cfg, http })
    }

    /// Cookie policy for the token cookies, from the startup configuration.
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::strict(
            self.cfg.access_cookie_max_age(),
            self.cfg.refresh_cookie_max_age(),
        )
    }
}
