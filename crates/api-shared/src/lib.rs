//! # API Shared
//!
//! Shared utilities and definitions for the Chartview REST surface.
//!
//! Contains:
//! - Request/response DTOs (`dto` module)
//! - Shared services like `HealthService`
//! - Token cookie construction and parsing (usable by any HTTP front)
//!
//! Used by `api-rest` for common functionality.

pub mod auth;
pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
