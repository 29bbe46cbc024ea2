//! Server-side calls to the remote EHR API.
//!
//! Every call here is made with the access token the browser presented in its
//! cookie. The gateway never refreshes tokens: an expired token is the
//! browser-side session client's problem, and surfaces as 401 to the caller.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;
use chartview_core::constants::FHIR_PATIENT_PATH;

/// Fetch one page of the remote patient collection.
pub async fn fetch_patient_bundle(
    state: &AppState,
    token: &str,
    count: u32,
    offset: u32,
) -> Result<Value, ApiError> {
    let url = format!("{}{}", state.cfg.ehr_base_url(), FHIR_PATIENT_PATH);
    let response = state
        .http
        .get(&url)
        .query(&[("_count", count.to_string()), ("_offset", offset.to_string())])
        .bearer_auth(token)
        .send()
        .await?;
    dispatch(response).await
}

/// Fetch a single patient resource.
pub async fn fetch_patient(state: &AppState, token: &str, id: &str) -> Result<Value, ApiError> {
    let url = format!("{}{}/{}", state.cfg.ehr_base_url(), FHIR_PATIENT_PATH, id);
    let response = state.http.get(&url).bearer_auth(token).send().await?;
    dispatch(response).await
}

/// Write a full patient resource back to the remote system.
pub async fn store_patient(
    state: &AppState,
    token: &str,
    id: &str,
    resource: &Value,
) -> Result<Value, ApiError> {
    let url = format!("{}{}/{}", state.cfg.ehr_base_url(), FHIR_PATIENT_PATH, id);
    let response = state
        .http
        .put(&url)
        .bearer_auth(token)
        .json(resource)
        .send()
        .await?;
    dispatch(response).await
}

async fn dispatch(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Auth(
            "remote API rejected the access token".into(),
        ));
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound("Patient not found".into()));
    }
    Err(ApiError::Remote {
        status: status.as_u16(),
        message: "remote API request failed".into(),
    })
}
