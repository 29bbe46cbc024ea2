//! # Chartview Core
//!
//! Shared foundation for the Chartview dashboard gateway.
//!
//! This crate contains configuration, the error taxonomy, and fixed names used
//! across the workspace:
//! - `CoreConfig` resolved once at process startup
//! - `DashboardError` covering every failure class the gateway surfaces
//! - cookie, OAuth, and FHIR path constants
//!
//! **No API concerns**: HTTP servers, outbound clients, or resource mapping
//! belong in `api-rest`, `session`, or `fhir`.

pub mod config;
pub mod constants;
pub mod error;

pub use config::CoreConfig;
pub use error::{DashboardError, DashboardResult};
