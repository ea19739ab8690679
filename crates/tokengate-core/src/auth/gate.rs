//! The guard run when a gated route is activated.
//!
//! The decision logic is split into pure steps so it can be tested without a
//! backend:
//!
//! 1. [`GateCheck::plan`] looks at the stored token and decides whether a
//!    verification call is needed at all.
//! 2. [`GateIntent::from_outcome`] maps the verification outcome to an intent.
//!
//! [`AuthGate::activate`] strings them together with the one network call and
//! the one store deletion.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::route::Route;

use super::{AuthBackend, AuthError, TokenStore};

/// What to do with the stored token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCheck {
    /// Ask the backend about this token
    Verify(String),
    /// Nothing worth verifying; fail without a network call
    Reject,
}

impl GateCheck {
    /// An absent or empty token is rejected locally.
    pub fn plan(stored: Option<String>) -> Self {
        match stored {
            Some(token) if !token.is_empty() => GateCheck::Verify(token),
            _ => GateCheck::Reject,
        }
    }
}

/// Result of one verification attempt. Backend rejection and transport
/// failure are deliberately the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Accepted,
    Rejected,
}

/// What the shell should do after the gate ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateIntent {
    /// Keep showing the gated page
    Stay,
    /// Leave the gated page. The token has already been cleared.
    Redirect { to: Route, reason: AuthError },
}

impl GateIntent {
    pub fn from_outcome(outcome: VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Accepted => GateIntent::Stay,
            VerificationOutcome::Rejected => GateIntent::Redirect {
                to: Route::Login,
                reason: AuthError::VerificationFailed,
            },
        }
    }

    /// Route to navigate to, if any
    pub fn target(&self) -> Option<Route> {
        match self {
            GateIntent::Stay => None,
            GateIntent::Redirect { to, .. } => Some(*to),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, GateIntent::Stay)
    }
}

/// Guard for gated routes. Construct once and call [`activate`](Self::activate)
/// on every activation; there is no in-flight de-duplication.
pub struct AuthGate<B> {
    backend: B,
    store: Arc<dyn TokenStore>,
}

impl<B: Clone> Clone for AuthGate<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<B: AuthBackend> AuthGate<B> {
    pub fn new(backend: B, store: Arc<dyn TokenStore>) -> Self {
        Self { backend, store }
    }

    /// Run the check once: read, verify, and on failure clear the store.
    pub async fn activate(&self) -> GateIntent {
        let stored = match self.store.read() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        let outcome = match GateCheck::plan(stored) {
            GateCheck::Reject => {
                debug!("No stored token, skipping verification");
                VerificationOutcome::Rejected
            }
            GateCheck::Verify(token) => match self.backend.verify_token(&token).await {
                Ok(()) => VerificationOutcome::Accepted,
                Err(e) => {
                    info!(error = %e, "Token verification failed");
                    VerificationOutcome::Rejected
                }
            },
        };

        let intent = GateIntent::from_outcome(outcome);
        if !intent.passed() {
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "Failed to clear stored token");
            }
        }
        intent
    }
}
