//! Authentication module: the token store, the login flow and the auth gate.
//!
//! This module provides:
//! - `TokenStore`: the single persisted token slot, with memory, file and
//!   OS keychain implementations
//! - `LoginFlow`: credentials → token → store → navigate to the gated route
//! - `AuthGate`: stored token → verification → stay, or clear + redirect
//!
//! Both flows return intents instead of navigating; the shell interprets them
//! with a [`Router`](crate::route::Router).

pub mod backend;
pub mod error;
pub mod gate;
pub mod keyring_store;
pub mod login;
pub mod store;

pub use backend::AuthBackend;
pub use error::AuthError;
pub use gate::{AuthGate, GateCheck, GateIntent, VerificationOutcome};
pub use keyring_store::KeyringTokenStore;
pub use login::{LoginFlow, LoginForm, LoginIntent};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};

#[cfg(test)]
pub(crate) mod testing;
