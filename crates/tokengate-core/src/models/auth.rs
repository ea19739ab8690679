use std::fmt;

use serde::{Deserialize, Serialize};

/// Username/password pair captured from the login form.
///
/// Transient: built on submit, handed to the backend, dropped. Never persisted.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are required; nothing else is checked.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful `POST /token`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of a successful `POST /register`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_is_complete() {
        assert!(Credentials::new("alice", "secret").is_complete());
        assert!(!Credentials::new("", "secret").is_complete());
        assert!(!Credentials::new("alice", "").is_complete());
        assert!(!Credentials::new("", "").is_complete());
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("alice", "hunter2"));
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_parse_token_response() {
        let json = r#"{"access_token": "abc123", "token_type": "bearer"}"#;
        let resp: TokenResponse = serde_json::from_str(json).expect("valid token json");
        assert_eq!(resp.access_token, "abc123");
        assert_eq!(resp.token_type.as_deref(), Some("bearer"));

        // token_type is optional
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token": "x"}"#).expect("valid token json");
        assert_eq!(resp.token_type, None);

        assert!(serde_json::from_str::<TokenResponse>(r#"{"token": "x"}"#).is_err());
    }

    #[test]
    fn test_parse_registered_user_ignores_extra_fields() {
        let json = r#"{"id": 7, "username": "alice", "hashed_password": "$argon2id$..."}"#;
        let user: RegisteredUser = serde_json::from_str(json).expect("valid user json");
        assert_eq!(
            user,
            RegisteredUser {
                id: 7,
                username: "alice".to_string()
            }
        );
    }
}
