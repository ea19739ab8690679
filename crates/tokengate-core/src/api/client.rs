//! API client for the auth and finance REST backends.
//!
//! The auth backend issues and verifies tokens; the finance backend lists and
//! creates transactions. Both may live on the same host.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::AuthBackend;
use crate::models::{Credentials, NewTransaction, RegisteredUser, TokenResponse, Transaction};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default page size for `GET /transactions`, matching the backend default.
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 100;

/// API client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    auth_base: Url,
    finance_base: Url,
}

impl ApiClient {
    /// Create a new client talking to the given auth and finance base URLs
    pub fn new(auth_base_url: &str, finance_base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            auth_base: Self::parse_base(auth_base_url)?,
            finance_base: Self::parse_base(finance_base_url)?,
        })
    }

    fn parse_base(raw: &str) -> Result<Url, ApiError> {
        let url = Url::parse(raw)
            .map_err(|e| ApiError::InvalidUrl(format!("{raw:?}: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{raw:?} cannot be used as a base")));
        }
        Ok(url)
    }

    /// Append path segments to a base URL. Each segment is percent-encoded,
    /// so a token containing `/` or `?` stays a single segment.
    fn endpoint(base: &Url, segments: &[&str]) -> Url {
        let mut url = base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to parse {what}: {e}")))
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
        what: &str,
    ) -> Result<T, ApiError> {
        debug!(%url, "POST");
        let response = self.client.post(url).json(body).send().await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, what).await
    }

    // ===== Auth backend =====

    /// Exchange credentials for an access token (`POST /token`).
    ///
    /// The body is form-urlencoded, as the OAuth2 password flow expects.
    pub async fn issue_token(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let url = Self::endpoint(&self.auth_base, &["token"]);
        debug!(%url, username = %credentials.username, "Requesting token");

        let response = self
            .client
            .post(url)
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "token response").await
    }

    /// Ask the backend whether a token is still valid (`GET /verify-token/{token}`).
    /// Any 2xx is success; the body is not consulted.
    pub async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        let url = Self::endpoint(&self.auth_base, &["verify-token", token]);
        // The URL embeds the token, so only the base is logged.
        debug!(base = %self.auth_base, "Verifying token");

        let response = self.client.get(url).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// Create an account (`POST /register`)
    pub async fn register(&self, credentials: &Credentials) -> Result<RegisteredUser, ApiError> {
        let url = Self::endpoint(&self.auth_base, &["register"]);
        self.post_json(url, credentials, "register response").await
    }

    // ===== Finance backend =====

    /// Fetch a page of transactions (`GET /transactions?skip=&limit=`)
    pub async fn list_transactions(&self, skip: u32, limit: u32) -> Result<Vec<Transaction>, ApiError> {
        let mut url = Self::endpoint(&self.finance_base, &["transactions"]);
        url.query_pairs_mut()
            .append_pair("skip", &skip.to_string())
            .append_pair("limit", &limit.to_string());
        debug!(%url, "GET");

        let response = self.client.get(url).send().await?;
        let response = Self::check_response(response).await?;
        let transactions: Vec<Transaction> = Self::parse_json(response, "transactions").await?;
        if transactions.len() > limit as usize {
            warn!(
                returned = transactions.len(),
                limit, "Backend returned more transactions than requested"
            );
        }
        Ok(transactions)
    }

    /// Create a transaction (`POST /transactions`)
    pub async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction, ApiError> {
        let url = Self::endpoint(&self.finance_base, &["transactions"]);
        self.post_json(url, transaction, "created transaction").await
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn issue_token(&self, credentials: &Credentials) -> Result<String, ApiError> {
        ApiClient::issue_token(self, credentials)
            .await
            .map(|resp| resp.access_token)
    }

    async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        ApiClient::verify_token(self, token).await
    }
}
