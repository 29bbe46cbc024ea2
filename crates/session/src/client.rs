//! Refreshing EHR API client.
//!
//! Every call attaches the current access token as a bearer header. A 401
//! response triggers the refresh protocol and exactly one retry with the new
//! token; a 401 on the retried call surfaces as a failure so a remote endpoint
//! that always rejects cannot cause a refresh loop.
//!
//! The protocol's defining property is single-flight: no matter how many
//! concurrent calls hit 401 at once, at most one refresh exchange is in
//! flight. Callers that observe an active refresh enqueue a continuation and
//! are resumed with that refresh's outcome: resolved with the shared new
//! token, or rejected if it failed. Rejection is explicit so abandoned queues
//! never leave callers hanging.

use std::sync::Arc;
use std::time::Duration;

use chartview_core::constants::{GRANT_TYPE_REFRESH, OAUTH_TOKEN_PATH};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::{oneshot, Mutex};

use crate::error::SessionError;
use crate::token::{CookiePolicy, TokenGrant, TokenKind, TokenStore};

/// HTTP client timeout for remote API requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Continuation for a caller parked behind an in-flight refresh.
type RefreshWaiter = oneshot::Sender<Result<String, RefreshFailed>>;

/// Marker carried to parked callers when the shared refresh fails.
#[derive(Clone, Copy, Debug)]
struct RefreshFailed;

/// Refresh protocol state. One per client instance.
enum RefreshState {
    Idle,
    Refreshing(Vec<RefreshWaiter>),
}

/// Authenticated client for the remote EHR API.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    store: Arc<dyn TokenStore>,
    policy: CookiePolicy,
    refresh: Mutex<RefreshState>,
}

impl SessionClient {
    /// Create a new client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Url`] if the base URL does not parse or uses a
    /// scheme other than http/https, or [`SessionError::Network`] if the
    /// underlying HTTP client cannot be constructed.
    pub fn new(
        base_url: &str,
        client_id: &str,
        store: Arc<dyn TokenStore>,
        policy: CookiePolicy,
    ) -> Result<Self, SessionError> {
        let cleaned = base_url.trim_end_matches('/');

        let parsed = url::Url::parse(cleaned)
            .map_err(|e| SessionError::Url(format!("invalid base URL '{cleaned}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SessionError::Url(format!(
                "base URL must use http or https, got: {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: cleaned.to_string(),
            client_id: client_id.to_string(),
            store,
            policy,
            refresh: Mutex::new(RefreshState::Idle),
        })
    }

    /// GET a resource path relative to the base URL.
    pub async fn get(&self, path: &str) -> Result<Value, SessionError> {
        self.request(Method::GET, path, None).await
    }

    /// PUT a JSON body to a resource path relative to the base URL.
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, SessionError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    /// Issue an authenticated call, refreshing and retrying once on 401.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotAuthenticated`] when no access token is held
    /// - [`SessionError::LoginRequired`] when the refresh protocol fails
    /// - [`SessionError::Unauthorized`] when the retried call still gets 401
    /// - [`SessionError::Remote`] for any other non-2xx remote response
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, SessionError> {
        let token = self
            .store
            .get(TokenKind::Access)
            .ok_or(SessionError::NotAuthenticated)?;

        let first = self.send_with_token(&method, path, body, &token).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Self::decode(first).await;
        }

        let fresh = self.refresh_access_token().await?;
        let retry = self.send_with_token(&method, path, body, &fresh).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            return Err(SessionError::Unauthorized);
        }
        Self::decode(retry).await
    }

    /// Discard the session's tokens.
    pub fn logout(&self) {
        self.store.clear();
    }

    async fn send_with_token(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        token: &str,
    ) -> Result<reqwest::Response, SessionError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    async fn decode(response: reqwest::Response) -> Result<Value, SessionError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        Err(SessionError::Remote {
            status: status.as_u16(),
            message: "remote API request failed".into(),
        })
    }

    /// Run the refresh protocol, or join the one already in flight.
    ///
    /// Returns the new access token. On failure the store is cleared and
    /// every parked caller is rejected; the session is over.
    async fn refresh_access_token(&self) -> Result<String, SessionError> {
        let parked = {
            let mut state = self.refresh.lock().await;
            match &mut *state {
                RefreshState::Refreshing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = parked {
            // Another caller owns the in-flight refresh; share its outcome.
            return match rx.await {
                Ok(Ok(access)) => Ok(access),
                _ => Err(SessionError::LoginRequired),
            };
        }

        let outcome = self.perform_refresh().await;

        let waiters = {
            let mut state = self.refresh.lock().await;
            match std::mem::replace(&mut *state, RefreshState::Idle) {
                RefreshState::Refreshing(waiters) => waiters,
                RefreshState::Idle => Vec::new(),
            }
        };

        match outcome {
            Ok(access) => {
                for waiter in waiters {
                    let _ = waiter.send(Ok(access.clone()));
                }
                Ok(access)
            }
            Err(err) => {
                tracing::warn!("token refresh failed: {err}");
                self.store.clear();
                for waiter in waiters {
                    let _ = waiter.send(Err(RefreshFailed));
                }
                Err(SessionError::LoginRequired)
            }
        }
    }

    /// The actual refresh exchange. Called by exactly one task at a time.
    async fn perform_refresh(&self) -> Result<String, SessionError> {
        let refresh = self
            .store
            .get(TokenKind::Refresh)
            .ok_or(SessionError::LoginRequired)?;

        let response = self
            .http
            .post(format!("{}{}", self.base_url, OAUTH_TOKEN_PATH))
            .form(&[
                ("grant_type", GRANT_TYPE_REFRESH),
                ("client_id", self.client_id.as_str()),
                ("refresh_token", refresh.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SessionError::Remote {
                status: response.status().as_u16(),
                message: "refresh grant rejected".into(),
            });
        }

        let grant: TokenGrant = response.json().await?;
        let pair = grant.into_pair(Some(refresh.as_str())).ok_or_else(|| {
            SessionError::Remote {
                status: 502,
                message: "token endpoint returned no usable pair".into(),
            }
        })?;
        let access = pair.access.clone();
        self.store.set(&pair, &self.policy);
        Ok(access)
    }
}
