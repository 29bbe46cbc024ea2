//! Token pair storage and transport policy.
//!
//! Tokens are opaque bearer credentials issued by the remote API; nothing in
//! this module inspects them. The [`TokenStore`] trait abstracts the backing
//! jar so the refresh protocol works identically over an in-memory store, a
//! browser cookie jar, or any secure key-value backing.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Which member of the token pair to read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Opaque access/refresh credential pair.
///
/// At most one pair is current at any time; a refresh atomically replaces
/// both members.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Wire shape of the remote token endpoint's response, for both the password
/// and refresh grants.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TokenGrant {
    pub access_token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenGrant {
    /// Form the replacement token pair from this grant.
    ///
    /// Some servers omit `refresh_token` on a refresh grant, in which case the
    /// previous refresh token stays valid and carries over. Returns `None`
    /// when no refresh token is available from either side.
    pub fn into_pair(self, previous_refresh: Option<&str>) -> Option<TokenPair> {
        let refresh = self
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))?;
        Some(TokenPair {
            access: self.access_token,
            refresh,
        })
    }
}

/// Transport policy for persisted tokens.
///
/// Declares per-token expiry and the cookie security flags (not readable by
/// scripts, encrypted transport only, not sent cross-site). Backings that are
/// not cookie jars may ignore the flags.
#[derive(Clone, Copy, Debug)]
pub struct CookiePolicy {
    /// Access token lifetime in seconds.
    pub access_max_age: i64,

    /// Refresh token lifetime in seconds.
    pub refresh_max_age: i64,

    pub http_only: bool,
    pub secure: bool,
    pub same_site_strict: bool,
}

impl CookiePolicy {
    /// Full-security policy: HttpOnly, Secure, SameSite=Strict.
    pub fn strict(access_max_age: i64, refresh_max_age: i64) -> Self {
        Self {
            access_max_age,
            refresh_max_age,
            http_only: true,
            secure: true,
            same_site_strict: true,
        }
    }
}

/// Storage for the current token pair.
///
/// `set` replaces both members atomically; partial updates are not
/// expressible. Token contents are never validated.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Option<String>;
    fn set(&self, pair: &TokenPair, policy: &CookiePolicy);
    fn clear(&self);
}

/// In-process token store, for embedded sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing pair.
    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            inner: Mutex::new(Some(pair)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        let held = self.inner.lock().expect("token store lock poisoned");
        held.as_ref().map(|pair| match kind {
            TokenKind::Access => pair.access.clone(),
            TokenKind::Refresh => pair.refresh.clone(),
        })
    }

    fn set(&self, pair: &TokenPair, _policy: &CookiePolicy) {
        let mut held = self.inner.lock().expect("token store lock poisoned");
        *held = Some(pair.clone());
    }

    fn clear(&self) {
        let mut held = self.inner.lock().expect("token store lock poisoned");
        *held = None;
    }
}
