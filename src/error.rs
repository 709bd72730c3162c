//! Error type for everything the remote API or transport can do wrong.
//!
//! Every fallible network operation in this crate returns `RestResult<T>`.
//! The only local failure that is *not* a [`RestError`] is date parsing,
//! which surfaces chrono's `ParseError` directly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Convenience alias.
pub type RestResult<T> = Result<T, RestError>;

/// Categorised failure kinds, for caller-side branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestErrorKind {
    /// Token rejected (HTTP 401) or token exchange refused.
    AuthFailed,
    /// Path does not exist (`path/not_found/…` routes).
    NotFound,
    /// Path already exists or edit conflict (`path/conflict/…` routes).
    Conflict,
    /// Rate-limited (HTTP 429).
    RateLimited,
    /// Bad request / invalid parameter (4xx otherwise).
    InvalidRequest,
    /// 5xx from the API.
    ServerError,
    /// DNS, connect, TLS or timeout failure before a status was received.
    NetworkError,
    /// Response body did not decode as the expected JSON shape.
    ProtocolError,
}

impl fmt::Display for RestErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Structured error returned by every fallible client operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestError {
    pub kind: RestErrorKind,
    pub message: String,
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    /// Raw Dropbox `error_summary` route, when present.
    pub error_summary: Option<String>,
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "[{} {}] {}", self.kind, code, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    pub fn new(kind: RestErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            status: None,
            error_summary: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    // ── Convenience constructors ─────────────────────────────────

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::new(RestErrorKind::AuthFailed, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(RestErrorKind::NotFound, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(RestErrorKind::Conflict, msg)
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::new(RestErrorKind::NetworkError, msg)
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::new(RestErrorKind::ProtocolError, msg)
    }

    /// True when the error means "that path does not exist".
    ///
    /// `change_working_directory` branches on this to distinguish a
    /// missing folder from a real failure.
    pub fn is_not_found(&self) -> bool {
        self.kind == RestErrorKind::NotFound
    }

    /// True when the error means "something is already at that path".
    pub fn is_conflict(&self) -> bool {
        self.kind == RestErrorKind::Conflict
    }

    /// Classify a non-2xx API response into the appropriate kind.
    ///
    /// Dropbox reports most path errors as HTTP 409 with a routed
    /// `error_summary` such as `path/not_found/..` or
    /// `path/conflict/folder/..`, so the summary is inspected before
    /// the status code.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        let summary = parse_error_summary(body);

        let kind = match summary.as_deref() {
            Some(s) if s.contains("not_found") => RestErrorKind::NotFound,
            Some(s) if s.contains("conflict") => RestErrorKind::Conflict,
            Some(s) if s.contains("invalid_access_token") || s.contains("expired_access_token") => {
                RestErrorKind::AuthFailed
            }
            _ => match status {
                401 => RestErrorKind::AuthFailed,
                404 => RestErrorKind::NotFound,
                409 => RestErrorKind::Conflict,
                429 => RestErrorKind::RateLimited,
                _ if status >= 500 => RestErrorKind::ServerError,
                _ => RestErrorKind::InvalidRequest,
            },
        };

        let message = summary
            .clone()
            .unwrap_or_else(|| format!("Dropbox API error (HTTP {status})"));

        Self {
            kind,
            message,
            status: Some(status),
            error_summary: summary,
        }
    }
}

/// Try to extract `error_summary` from the Dropbox error envelope:
/// `{ "error_summary": "path/not_found/..", "error": { … } }`.
fn parse_error_summary(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v["error_summary"].as_str().map(String::from)
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(format!("HTTP transport error: {err}"))
        }
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        Self::protocol(format!("JSON error: {err}"))
    }
}

impl From<std::io::Error> for RestError {
    fn from(err: std::io::Error) -> Self {
        Self::new(
            RestErrorKind::InvalidRequest,
            format!("Failed to read upload content: {err}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_409_not_found() {
        let body = r#"{"error_summary":"path/not_found/..","error":{".tag":"path","path":{".tag":"not_found"}}}"#;
        let err = RestError::from_api_response(409, body);
        assert_eq!(err.kind, RestErrorKind::NotFound);
        assert!(err.is_not_found());
        assert_eq!(err.status, Some(409));
        assert_eq!(err.error_summary.as_deref(), Some("path/not_found/.."));
    }

    #[test]
    fn classify_409_conflict_folder() {
        let body = r#"{"error_summary":"path/conflict/folder/..","error":{".tag":"path"}}"#;
        let err = RestError::from_api_response(409, body);
        assert_eq!(err.kind, RestErrorKind::Conflict);
        assert!(err.is_conflict());
    }

    #[test]
    fn classify_401_auth() {
        let err = RestError::from_api_response(401, "");
        assert_eq!(err.kind, RestErrorKind::AuthFailed);
        assert!(err.message.contains("401"));
    }

    #[test]
    fn classify_invalid_token_summary() {
        let body = r#"{"error_summary":"invalid_access_token/","error":{".tag":"invalid_access_token"}}"#;
        let err = RestError::from_api_response(401, body);
        assert_eq!(err.kind, RestErrorKind::AuthFailed);
    }

    #[test]
    fn classify_429_rate_limited() {
        let err = RestError::from_api_response(429, "");
        assert_eq!(err.kind, RestErrorKind::RateLimited);
    }

    #[test]
    fn classify_500_server() {
        let err = RestError::from_api_response(503, "unavailable");
        assert_eq!(err.kind, RestErrorKind::ServerError);
    }

    #[test]
    fn classify_garbage_body_uses_status() {
        let err = RestError::from_api_response(404, "<html>not json</html>");
        assert_eq!(err.kind, RestErrorKind::NotFound);
        assert!(err.error_summary.is_none());
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = RestError::not_found("missing").with_status(409);
        let s = format!("{err}");
        assert!(s.contains("409"));
        assert!(s.contains("missing"));
        assert!(s.contains("NotFound"));
    }

    #[test]
    fn json_error_is_protocol() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{broken");
        let err: RestError = parse.unwrap_err().into();
        assert_eq!(err.kind, RestErrorKind::ProtocolError);
    }
}
