//! Data models exchanged with the auth and finance backends.
//!
//! - `Credentials`, `TokenResponse`, `RegisteredUser`: the auth backend
//! - `Transaction`, `NewTransaction`: the finance backend

pub mod auth;
pub mod transaction;

pub use auth::{Credentials, RegisteredUser, TokenResponse};
pub use transaction::{NewTransaction, Transaction};
