//! REST API client module.
//!
//! This module provides the `ApiClient` for the two backends the frontends
//! talk to: the auth backend (`/token`, `/verify-token/{token}`, `/register`)
//! and the finance backend (`/transactions`).

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_TRANSACTION_LIMIT};
pub use error::ApiError;
