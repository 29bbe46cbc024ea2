//! Login and logout: the credential exchange with the remote EHR API.

use api_shared::auth::{expired_token_cookies, token_cookies};
use api_shared::dto::{ErrorBody, LoginRequest, MessageRes};
use axum::extract::{Form, State};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Json};
use session::TokenGrant;

use crate::error::ApiError;
use crate::state::AppState;
use chartview_core::constants::{GRANT_TYPE_PASSWORD, OAUTH_TOKEN_PATH};

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued and persisted in cookies"),
        (status = 400, description = "Missing username or password", body = ErrorBody),
        (status = 401, description = "Credentials rejected by the remote API", body = ErrorBody)
    )
)]
/// Exchange credentials for a token pair
///
/// Performs the password-grant exchange with the remote EHR API. On success
/// the resulting pair is persisted as HttpOnly cookies and the raw token
/// response is returned. Credentials are never logged and never echoed into
/// error bodies.
///
/// # Errors
/// Returns `400 Bad Request` if either field is empty (no outbound call is
/// made), or the remote status code if the exchange is rejected.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Form(req): Form<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() {
        return Err(ApiError::Validation("username is required".into()));
    }
    if req.password.trim().is_empty() {
        return Err(ApiError::Validation("password is required".into()));
    }

    let response = state
        .http
        .post(format!(
            "{}{}",
            state.cfg.ehr_base_url(),
            OAUTH_TOKEN_PATH
        ))
        .form(&[
            ("grant_type", GRANT_TYPE_PASSWORD),
            ("client_id", state.cfg.client_id()),
            ("username", req.username.as_str()),
            ("password", req.password.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, "credential exchange rejected");
        return Err(ApiError::Remote {
            status: status.as_u16(),
            message: "login failed".into(),
        });
    }

    let grant: TokenGrant = response.json().await?;
    let pair = grant.clone().into_pair(None).ok_or_else(|| {
        ApiError::Unknown("grant response carried no refresh token".into())
    })?;

    let [access_cookie, refresh_cookie] = token_cookies(&pair, &state.cookie_policy());
    Ok((
        AppendHeaders([(SET_COOKIE, access_cookie), (SET_COOKIE, refresh_cookie)]),
        Json(grant),
    ))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Token cookies destroyed", body = MessageRes)
    )
)]
/// Destroy the session's token cookies
#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let [access_cookie, refresh_cookie] = expired_token_cookies(&state.cookie_policy());
    (
        AppendHeaders([(SET_COOKIE, access_cookie), (SET_COOKIE, refresh_cookie)]),
        Json(MessageRes {
            message: "Logged out".into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::test_support::{body_json, form_request, spawn_fake_ehr, test_app, FakeEhr};
    use axum::http::StatusCode;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    #[tokio::test]
    async fn empty_password_is_rejected_without_a_remote_call() {
        let fake = FakeEhr::default();
        let grant_calls = fake.grant_calls.clone();
        let app = test_app(spawn_fake_ehr(fake).await);

        let response = app
            .oneshot(form_request("/login", "username=clin&password="))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "password is required");
        assert_eq!(grant_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_username_is_rejected_without_a_remote_call() {
        let fake = FakeEhr::default();
        let grant_calls = fake.grant_calls.clone();
        let app = test_app(spawn_fake_ehr(fake).await);

        let response = app
            .oneshot(form_request("/login", "username=&password=secret"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(grant_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_login_sets_both_token_cookies() {
        let app = test_app(spawn_fake_ehr(FakeEhr::default()).await);

        let response = app
            .oneshot(form_request("/login", "username=clin&password=secret"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<String> = response
            .headers()
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("access_token=acc-1"));
        assert!(cookies[1].starts_with("refresh_token=ref-1"));
        for cookie in &cookies {
            assert!(cookie.contains("HttpOnly"));
            assert!(cookie.contains("Secure"));
            assert!(cookie.contains("SameSite=Strict"));
        }

        let body = body_json(response).await;
        assert_eq!(body["access_token"], "acc-1");
    }

    #[tokio::test]
    async fn rejected_credentials_pass_the_remote_status_through() {
        let fake = FakeEhr {
            reject_credentials: true,
            ..Default::default()
        };
        let app = test_app(spawn_fake_ehr(fake).await);

        let response = app
            .oneshot(form_request("/login", "username=clin&password=wrong"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "login failed");
    }

    #[tokio::test]
    async fn logout_expires_both_cookies() {
        let app = test_app("http://127.0.0.1:9".to_string());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(axum::body::Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<String> = response
            .headers()
            .get_all(axum::http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("access_token=; Path=/; Max-Age=0"));
        assert!(cookies[1].starts_with("refresh_token=; Path=/; Max-Age=0"));
    }
}
