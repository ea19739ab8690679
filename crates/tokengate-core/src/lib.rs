//! tokengate core: the client side of a bearer-token login.
//!
//! - [`auth`]: token store, login flow and auth gate state machines
//! - [`api`]: HTTP client for the auth and finance backends
//! - [`route`]: route table and navigation history
//! - [`finance`]: transaction form and list state
//! - [`config`]: configuration file and environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod finance;
pub mod models;
pub mod route;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, AuthGate, GateIntent, LoginFlow, LoginForm, LoginIntent, TokenStore};
pub use config::Config;
pub use route::{Route, Router};
