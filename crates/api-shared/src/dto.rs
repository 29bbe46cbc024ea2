//! Request and response bodies for the REST surface.

use fhir::{PatientEdits, PatientView};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Login form body.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Health check response.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error envelope returned by every failing route.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// Plain acknowledgement body.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// A single patient: the raw remote resource plus its flattened projection.
///
/// The raw document rides along because edits must be merged back into it;
/// dropping it here would force the UI to write back a lossy view.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct PatientDetail {
    pub id: String,

    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[schema(value_type = Object)]
    pub raw: Value,

    #[schema(value_type = Object)]
    pub formatted: PatientView,
}

/// Body of a patient update.
///
/// `id` must match the path id; the remaining fields are the edit form's
/// optional changes.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePatientRequest {
    pub id: String,

    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub edits: PatientEdits,
}

/// Response of a successful patient update.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdatePatientRes {
    pub message: String,
    pub patient: PatientDetail,
}
