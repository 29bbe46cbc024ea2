//! Error taxonomy for the dashboard gateway.
//!
//! Every failure the gateway can surface falls into one of these classes. The
//! HTTP mapping lives in `api-rest`; this crate only names the classes so all
//! layers agree on them.

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Missing or malformed required settings. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bad input shape. User-correctable, maps to 400.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Missing, expired, or rejected credentials. Maps to 401.
    #[error("authentication required: {0}")]
    Auth(String),

    /// The remote system reports the resource absent. Maps to 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx from the remote API, passed through with a sanitized
    /// message. The remote response body is never included.
    #[error("remote API error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Unexpected failure. Logged server-side, generic message to the caller.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
