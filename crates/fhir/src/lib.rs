//! FHIR wire/boundary support for the Chartview dashboard.
//!
//! This crate provides **translation helpers** between the remote EHR API's
//! nested patient resource JSON and the flattened display/edit shape the
//! dashboard renders:
//! - flattening with defined fallbacks for every absent field
//! - edit merge-back that preserves every unmodelled field of the raw resource
//! - bundle pagination derived strictly from navigation links
//!
//! Raw resources are handled as `serde_json::Value` rather than strict wire
//! structs: the remote system owns the format, and the write-back contract
//! requires fields this crate never models to survive a round trip untouched.

pub mod bundle;
pub mod extensions;
pub mod patient;

// Re-export facades
pub use bundle::Bundle;
pub use patient::Patient;

// Re-export public domain-level types
pub use bundle::{BundleLink, Pagination, PatientListPage};
pub use patient::{ContactPoint, PatientEdits, PatientName, PatientView};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
