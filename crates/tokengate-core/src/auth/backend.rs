use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::Credentials;

/// The two calls the auth flows make against the auth backend.
///
/// Implemented by [`ApiClient`](crate::api::ApiClient); tests substitute fakes.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for an access token
    async fn issue_token(&self, credentials: &Credentials) -> Result<String, ApiError>;

    /// Succeeds when the backend accepts the token
    async fn verify_token(&self, token: &str) -> Result<(), ApiError>;
}
