use thiserror::Error;

/// Errors surfaced to the user by the login flow and the auth gate.
///
/// None of these is fatal: login errors are fixed by resubmitting, and a
/// verification failure sends the user back to the login page.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingFields,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Login failed. Please try again.")]
    RequestFailed,

    #[error("Session could not be verified. Please log in again.")]
    VerificationFailed,
}
