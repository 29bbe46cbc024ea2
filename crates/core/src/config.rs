//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_ACCESS_COOKIE_MAX_AGE, DEFAULT_REFRESH_COOKIE_MAX_AGE};
use crate::{DashboardError, DashboardResult};

/// Core configuration resolved at startup.
///
/// The EHR base URL is validated and normalised here so no request handler
/// ever has to deal with a trailing slash or a bogus scheme.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    ehr_base_url: String,
    client_id: String,
    access_cookie_max_age: i64,
    refresh_cookie_max_age: i64,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Configuration`] if the base URL does not
    /// parse, uses a scheme other than http/https, the client id is empty, or
    /// either cookie lifetime is non-positive.
    pub fn new(
        ehr_base_url: String,
        client_id: String,
        access_cookie_max_age: Option<i64>,
        refresh_cookie_max_age: Option<i64>,
    ) -> DashboardResult<Self> {
        let cleaned = ehr_base_url.trim_end_matches('/').to_string();

        let parsed = url::Url::parse(&cleaned).map_err(|e| {
            DashboardError::Configuration(format!("invalid EHR base URL '{cleaned}': {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DashboardError::Configuration(format!(
                "EHR base URL must use http or https, got: {}",
                parsed.scheme()
            )));
        }

        if client_id.trim().is_empty() {
            return Err(DashboardError::Configuration(
                "EHR client id cannot be empty".into(),
            ));
        }

        let access_cookie_max_age = access_cookie_max_age.unwrap_or(DEFAULT_ACCESS_COOKIE_MAX_AGE);
        let refresh_cookie_max_age =
            refresh_cookie_max_age.unwrap_or(DEFAULT_REFRESH_COOKIE_MAX_AGE);
        if access_cookie_max_age <= 0 || refresh_cookie_max_age <= 0 {
            return Err(DashboardError::Configuration(
                "cookie max-age values must be positive".into(),
            ));
        }

        Ok(Self {
            ehr_base_url: cleaned,
            client_id,
            access_cookie_max_age,
            refresh_cookie_max_age,
        })
    }

    /// Base URL of the remote EHR API, without a trailing slash.
    pub fn ehr_base_url(&self) -> &str {
        &self.ehr_base_url
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Access cookie lifetime in seconds.
    pub fn access_cookie_max_age(&self) -> i64 {
        self.access_cookie_max_age
    }

    /// Refresh cookie lifetime in seconds.
    pub fn refresh_cookie_max_age(&self) -> i64 {
        self.refresh_cookie_max_age
    }
}

/// Parse an optional cookie max-age environment value.
///
/// `None` (variable unset) resolves to `Ok(None)` so the caller falls back to
/// the default; a present but malformed value is a configuration error rather
/// than a silent fallback.
pub fn cookie_max_age_from_env_value(value: Option<String>) -> DashboardResult<Option<i64>> {
    match value {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
            DashboardError::Configuration(format!("invalid cookie max-age value '{raw}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let cfg = CoreConfig::new(
            "https://ehr.example.org/".into(),
            "dashboard".into(),
            None,
            None,
        )
        .expect("valid config");
        assert_eq!(cfg.ehr_base_url(), "https://ehr.example.org");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = CoreConfig::new("ftp://ehr.example.org".into(), "dashboard".into(), None, None)
            .expect_err("should reject ftp scheme");
        match err {
            DashboardError::Configuration(msg) => assert!(msg.contains("http")),
            other => panic!("expected Configuration error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_client_id() {
        let err = CoreConfig::new("https://ehr.example.org".into(), "  ".into(), None, None)
            .expect_err("should reject empty client id");
        assert!(matches!(err, DashboardError::Configuration(_)));
    }

    #[test]
    fn applies_default_cookie_lifetimes() {
        let cfg = CoreConfig::new(
            "https://ehr.example.org".into(),
            "dashboard".into(),
            None,
            None,
        )
        .expect("valid config");
        assert_eq!(cfg.access_cookie_max_age(), 3_600);
        assert_eq!(cfg.refresh_cookie_max_age(), 7 * 24 * 3_600);
    }

    #[test]
    fn rejects_non_positive_cookie_lifetime() {
        let err = CoreConfig::new(
            "https://ehr.example.org".into(),
            "dashboard".into(),
            Some(0),
            None,
        )
        .expect_err("should reject zero max-age");
        assert!(matches!(err, DashboardError::Configuration(_)));
    }

    #[test]
    fn parses_cookie_max_age_env_value() {
        assert_eq!(
            cookie_max_age_from_env_value(Some("900".into())).expect("parse"),
            Some(900)
        );
        assert_eq!(cookie_max_age_from_env_value(None).expect("parse"), None);
        assert!(cookie_max_age_from_env_value(Some("soon".into())).is_err());
    }
}
