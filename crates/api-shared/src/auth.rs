//! Token cookie construction and parsing.
//!
//! The browser never sees token values from script: both tokens travel in
//! HttpOnly cookies whose attributes come from the session [`CookiePolicy`].
//! These helpers are plain string functions so any HTTP front (and any test)
//! can use them without pulling in a server framework.

use chartview_core::constants::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use session::{CookiePolicy, TokenPair};

/// Build a `Set-Cookie` value for one token.
pub fn set_cookie(name: &str, value: &str, max_age: i64, policy: &CookiePolicy) -> String {
    let mut cookie = format!("{name}={value}; Path=/; Max-Age={max_age}");
    if policy.http_only {
        cookie.push_str("; HttpOnly");
    }
    if policy.secure {
        cookie.push_str("; Secure");
    }
    if policy.same_site_strict {
        cookie.push_str("; SameSite=Strict");
    }
    cookie
}

/// `Set-Cookie` values persisting a token pair, access first.
pub fn token_cookies(pair: &TokenPair, policy: &CookiePolicy) -> [String; 2] {
    [
        set_cookie(
            ACCESS_TOKEN_COOKIE,
            &pair.access,
            policy.access_max_age,
            policy,
        ),
        set_cookie(
            REFRESH_TOKEN_COOKIE,
            &pair.refresh,
            policy.refresh_max_age,
            policy,
        ),
    ]
}

/// `Set-Cookie` values destroying both token cookies.
pub fn expired_token_cookies(policy: &CookiePolicy) -> [String; 2] {
    [
        set_cookie(ACCESS_TOKEN_COOKIE, "", 0, policy),
        set_cookie(REFRESH_TOKEN_COOKIE, "", 0, policy),
    ]
}

/// Extract a named cookie's value from a `Cookie` request header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
