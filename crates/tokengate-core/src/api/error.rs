use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token rejected")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    UnexpectedStatus(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// FastAPI error envelope: `{"detail": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: serde_json::Value,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull the human-readable `detail` out of a FastAPI error body, falling
    /// back to the raw (truncated) body.
    fn detail(body: &str) -> String {
        match serde_json::from_str::<ErrorDetail>(body) {
            Ok(ErrorDetail {
                detail: serde_json::Value::String(s),
            }) => s,
            Ok(ErrorDetail { detail }) => Self::truncate_body(&detail.to_string()),
            Err(_) => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 | 422 => ApiError::BadRequest(Self::detail(body)),
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(Self::truncate_body(body)),
            404 => ApiError::NotFound(Self::truncate_body(body)),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(Self::truncate_body(body)),
            _ => ApiError::UnexpectedStatus(format!(
                "{}: {}",
                status,
                Self::truncate_body(body)
            )),
        }
    }

    /// True when the server answered but refused the request, as opposed to
    /// the request never completing.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            ApiError::NetworkError(_) | ApiError::InvalidResponse(_) | ApiError::InvalidUrl(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, "no"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, ""),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::UnexpectedStatus(_)
        ));
    }

    #[test]
    fn test_bad_request_extracts_detail() {
        let err = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Username already registered"}"#,
        );
        match err {
            ApiError::BadRequest(detail) => assert_eq!(detail, "Username already registered"),
            other => panic!("unexpected error: {other:?}"),
        }

        // Not JSON: keep the body
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, "plain text");
        assert_eq!(err.to_string(), "Bad request: plain text");
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 520 total bytes)"));

        assert_eq!(ApiError::truncate_body("short"), "short");
    }

    #[test]
    fn test_is_rejection() {
        assert!(ApiError::Unauthorized.is_rejection());
        assert!(ApiError::ServerError(String::new()).is_rejection());
        assert!(ApiError::UnexpectedStatus(String::new()).is_rejection());
        assert!(!ApiError::InvalidResponse(String::new()).is_rejection());
    }
}
