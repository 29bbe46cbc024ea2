//! # Session
//!
//! Token lifecycle for the dashboard's connection to the remote EHR API.
//!
//! Contains:
//! - [`TokenStore`]: opaque access/refresh pair storage behind a trait, with
//!   the cookie transport policy described alongside
//! - [`SessionClient`]: outbound API client that attaches the bearer token,
//!   refreshes it once on 401, and coalesces concurrent refreshes into a
//!   single in-flight exchange
//!
//! The refresh state lives inside each client instance, never in process-wide
//! globals, so multiple independent sessions can coexist in one process.

pub mod client;
pub mod error;
pub mod token;

pub use client::SessionClient;
pub use error::SessionError;
pub use token::{CookiePolicy, MemoryTokenStore, TokenGrant, TokenKind, TokenPair, TokenStore};
