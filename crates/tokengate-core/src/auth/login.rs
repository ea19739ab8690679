//! Credentials in, stored token and navigation intent out.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::models::Credentials;
use crate::route::Route;

use super::{AuthBackend, AuthError, TokenStore};

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// What the shell should do after a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIntent {
    /// Token stored; go to the gated page
    Navigate(Route),
    /// Stay on the form; its error slot says why
    Stay,
    /// A submission was already in flight; nothing happened
    Ignored,
}

/// Login form state: the two fields, the error slot and the loading flag.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    error: Option<AuthError>,
    loading: bool,
}

impl LoginForm {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn error(&self) -> Option<AuthError> {
        self.error
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn button_label(&self) -> &'static str {
        if self.loading {
            "Logging in.."
        } else {
            "Login"
        }
    }

    /// Accept a typed username character unless it is a control character
    /// or the field is full
    pub fn push_username_char(&mut self, c: char) -> bool {
        push_bounded(&mut self.username, c, MAX_USERNAME_LENGTH)
    }

    pub fn push_password_char(&mut self, c: char) -> bool {
        push_bounded(&mut self.password, c, MAX_PASSWORD_LENGTH)
    }
}

fn push_bounded(field: &mut String, c: char, max: usize) -> bool {
    if field.chars().count() < max && !c.is_control() {
        field.push(c);
        true
    } else {
        false
    }
}

/// The login flow: validate, exchange credentials for a token, store it.
///
/// [`submit`](Self::submit) runs the whole thing. Shells that keep drawing
/// while the request is in flight call the three steps themselves:
/// [`begin`](Self::begin), [`exchange`](Self::exchange) on a task, then
/// [`finish`](Self::finish).
pub struct LoginFlow<B> {
    backend: B,
    store: Arc<dyn TokenStore>,
}

impl<B: Clone> Clone for LoginFlow<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            store: Arc::clone(&self.store),
        }
    }
}

impl<B: AuthBackend> LoginFlow<B> {
    pub fn new(backend: B, store: Arc<dyn TokenStore>) -> Self {
        Self { backend, store }
    }

    /// Validate the form and mark it loading.
    ///
    /// Returns the credentials to submit, or the intent to report when there
    /// is nothing to submit: `Stay` with `MissingFields` in the error slot, or
    /// `Ignored` while another submission is in flight.
    pub fn begin(&self, form: &mut LoginForm) -> Result<Credentials, LoginIntent> {
        if form.loading {
            return Err(LoginIntent::Ignored);
        }

        let credentials = form.credentials();
        if !credentials.is_complete() {
            form.error = Some(AuthError::MissingFields);
            return Err(LoginIntent::Stay);
        }

        form.error = None;
        form.loading = true;
        Ok(credentials)
    }

    /// Exchange credentials for a token and store it.
    ///
    /// The store is only written on success.
    pub async fn exchange(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let token = match self.backend.issue_token(credentials).await {
            Ok(token) => token,
            Err(e) if e.is_rejection() => {
                info!(username = %credentials.username, error = %e, "Login rejected");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "Login request failed");
                return Err(AuthError::RequestFailed);
            }
        };

        if token.is_empty() {
            warn!("Backend issued an empty token");
            return Err(AuthError::RequestFailed);
        }

        if let Err(e) = self.store.write(&token) {
            error!(error = %e, "Failed to store token");
            return Err(AuthError::RequestFailed);
        }

        info!(username = %credentials.username, "Login successful");
        Ok(token)
    }

    /// Apply an exchange result to the form.
    pub fn finish(&self, form: &mut LoginForm, result: Result<String, AuthError>) -> LoginIntent {
        form.loading = false;
        match result {
            Ok(_) => {
                form.password.clear();
                form.error = None;
                LoginIntent::Navigate(Route::Protected)
            }
            Err(e) => {
                form.error = Some(e);
                LoginIntent::Stay
            }
        }
    }

    /// Validate, exchange and apply in one go.
    pub async fn submit(&self, form: &mut LoginForm) -> LoginIntent {
        let credentials = match self.begin(form) {
            Ok(credentials) => credentials,
            Err(intent) => return intent,
        };
        let result = self.exchange(&credentials).await;
        self.finish(form, result)
    }
}
