//! Session-side errors.

/// Errors surfaced by the session layer.
///
/// [`SessionError::LoginRequired`] is the terminal outcome of the refresh
/// protocol: the embedding UI should discard the session and send the user
/// back to login. Everything else propagates to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No access token is held; the session was never established.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The refresh protocol failed irrecoverably; tokens have been cleared.
    #[error("session expired, login required")]
    LoginRequired,

    /// The remote API rejected the call even after a fresh token. No second
    /// refresh is attempted.
    #[error("request unauthorized after token refresh")]
    Unauthorized,

    /// Non-2xx remote response, passed through with a sanitized message.
    #[error("remote API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid base URL: {0}")]
    Url(String),
}
