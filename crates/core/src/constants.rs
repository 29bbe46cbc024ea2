//! Constants used throughout the Chartview workspace.
//!
//! This module contains all cookie names, remote API paths, and grant types to
//! ensure consistency across the codebase and make maintenance easier.

/// Cookie carrying the short-lived access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Cookie carrying the long-lived refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Path of the remote OAuth2-style token endpoint, relative to the EHR base URL.
pub const OAUTH_TOKEN_PATH: &str = "/oauth2/token";

/// Grant type for the credential exchange performed at login.
pub const GRANT_TYPE_PASSWORD: &str = "password";

/// Grant type for the token-rotation exchange performed on refresh.
pub const GRANT_TYPE_REFRESH: &str = "refresh_token";

/// Path of the remote patient resource collection, relative to the EHR base URL.
pub const FHIR_PATIENT_PATH: &str = "/fhir/R4/Patient";

/// Default address for the REST gateway when no explicit address is configured.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default access cookie lifetime, matching the typical remote token window.
pub const DEFAULT_ACCESS_COOKIE_MAX_AGE: i64 = 3_600;

/// Default refresh cookie lifetime.
pub const DEFAULT_REFRESH_COOKIE_MAX_AGE: i64 = 7 * 24 * 3_600;

/// Default page size for patient list requests.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
