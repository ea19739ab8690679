//! Scripted auth backend for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::ApiError;
use crate::models::Credentials;

use super::AuthBackend;

/// How the fake answers a call
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok,
    /// `issue_token` answers with this token; `verify_token` treats it as Ok
    Token(&'static str),
    Status(u16),
    Unreachable,
}

impl Reply {
    fn error(&self) -> Option<ApiError> {
        match self {
            Reply::Ok | Reply::Token(_) => None,
            Reply::Status(code) => Some(ApiError::from_status(
                StatusCode::from_u16(*code).expect("valid status code"),
                "",
            )),
            Reply::Unreachable => Some(ApiError::InvalidResponse("connection refused".into())),
        }
    }
}

#[derive(Clone)]
pub(crate) struct FakeBackend {
    token_reply: Reply,
    verify_reply: Reply,
    issued: Arc<Mutex<Vec<Credentials>>>,
    verified: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    pub(crate) fn new(token_reply: Reply, verify_reply: Reply) -> Self {
        Self {
            token_reply,
            verify_reply,
            issued: Arc::default(),
            verified: Arc::default(),
        }
    }

    pub(crate) fn issued(&self) -> Vec<Credentials> {
        self.issued.lock().unwrap().clone()
    }

    pub(crate) fn verified(&self) -> Vec<String> {
        self.verified.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthBackend for FakeBackend {
    async fn issue_token(&self, credentials: &Credentials) -> Result<String, ApiError> {
        self.issued.lock().unwrap().push(credentials.clone());
        if let Some(err) = self.token_reply.error() {
            return Err(err);
        }
        match self.token_reply {
            Reply::Token(token) => Ok(token.to_string()),
            _ => Ok("fake-token".to_string()),
        }
    }

    async fn verify_token(&self, token: &str) -> Result<(), ApiError> {
        self.verified.lock().unwrap().push(token.to_string());
        match self.verify_reply.error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
