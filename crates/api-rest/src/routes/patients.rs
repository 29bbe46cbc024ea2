//! Cookie-authenticated patient resource routes.
//!
//! Each route reads the access token from the browser's cookie, calls the
//! remote EHR API, and translates through the resource mapper. Remote failure
//! statuses pass through; the gateway adds nothing of its own beyond the
//! flattening.

use api_shared::dto::{ErrorBody, PatientDetail, UpdatePatientRequest, UpdatePatientRes};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Json;
use fhir::{Bundle, Patient, PatientListPage};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use super::access_token;
use crate::error::ApiError;
use crate::gateway;
use crate::state::AppState;
use chartview_core::constants::DEFAULT_PAGE_SIZE;

/// Paging query parameters for the patient list.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Patients per page.
    pub count: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/patients",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of flattened patients"),
        (status = 401, description = "No access token cookie", body = ErrorBody)
    )
)]
/// List patients
///
/// Proxies the remote patient search and returns the flattened page.
/// Pagination flags derive from the bundle's navigation links, never from
/// counts.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Json<PatientListPage>, ApiError> {
    let token = access_token(&headers)?;

    let page = query.page.unwrap_or(1).max(1);
    let count = query.count.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
    let offset = (page - 1) * count;

    let bundle = gateway::fetch_patient_bundle(&state, &token, count, offset).await?;
    Ok(Json(Bundle::page(&bundle, page)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient resource id")),
    responses(
        (status = 200, description = "Raw resource plus flattened projection", body = PatientDetail),
        (status = 401, description = "No access token cookie", body = ErrorBody),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
/// Fetch a single patient
///
/// Returns the raw remote resource alongside the flattened projection. The
/// raw document is what an edit must be merged back into.
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PatientDetail>, ApiError> {
    let token = access_token(&headers)?;
    let raw = gateway::fetch_patient(&state, &token, &id).await?;
    Ok(Json(patient_detail(raw)))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient resource id")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = UpdatePatientRes),
        (status = 400, description = "Id mismatch or malformed body", body = ErrorBody),
        (status = 401, description = "No access token cookie", body = ErrorBody),
        (status = 404, description = "Patient not found", body = ErrorBody)
    )
)]
/// Update a patient
///
/// The body's `id` must match the path id. The current raw resource is
/// fetched, the edits are merged onto it so unedited fields survive, and the
/// full document is written back to the remote system.
///
/// # Errors
/// Returns `400 Bad Request` on an id mismatch before any remote call is made.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdatePatientRequest>,
) -> Result<Json<UpdatePatientRes>, ApiError> {
    let token = access_token(&headers)?;

    if req.id != id {
        return Err(ApiError::Validation(
            "patient id in body does not match the path id".into(),
        ));
    }

    let current = gateway::fetch_patient(&state, &token, &id).await?;
    let merged = Patient::merge_edits(&current, &req.edits)?;
    let stored = gateway::store_patient(&state, &token, &id, &merged).await?;

    Ok(Json(UpdatePatientRes {
        message: "Patient updated".into(),
        patient: patient_detail(stored),
    }))
}

fn patient_detail(raw: Value) -> PatientDetail {
    let formatted = Patient::flatten(&raw);
    PatientDetail {
        id: formatted.id.clone(),
        resource_type: raw["resourceType"].as_str().unwrap_or("Patient").to_string(),
        raw,
        formatted,
    }
}
