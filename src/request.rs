//! Low-level HTTP layer for the Dropbox API v2.
//!
//! All API calls go through [`RestClient`], which handles:
//! - Bearer token injection
//! - RPC (JSON body) vs content-upload (raw body + `Dropbox-API-Arg`
//!   header) endpoint routing
//! - Per-call timeout
//! - JSON error envelope mapping into [`RestError`]
//!
//! There is deliberately no retry loop here: retry and backoff policy
//! belongs to the orchestration layer driving the client.

use crate::error::{RestError, RestResult};
use crate::header::http_header_encode;
use log::debug;
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base URLs for the two Dropbox endpoint families this client uses.
const API_BASE: &str = "https://api.dropboxapi.com/2";
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

/// Timeout applied when the caller has not configured one.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP client bound to a single access token.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::blocking::Client,
    access_token: String,
    api_base: String,
    content_base: String,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("api_base", &self.api_base)
            .field("token_preview", &self.masked_token())
            .finish()
    }
}

impl RestClient {
    /// Create a new client for the given access token.
    pub fn new(access_token: &str) -> RestResult<Self> {
        if access_token.is_empty() {
            return Err(RestError::auth("access token must not be empty"));
        }
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| RestError::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            access_token: access_token.to_string(),
            api_base: API_BASE.to_string(),
            content_base: CONTENT_BASE.to_string(),
            timeout: None,
        })
    }

    /// Override base URLs (for testing).
    #[cfg(test)]
    pub fn with_bases(mut self, api: &str, content: &str) -> Self {
        self.api_base = api.to_string();
        self.content_base = content.to_string();
        self
    }

    /// Set the per-call timeout; `None` falls back to the default.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Show a masked version of the token for logging.
    pub fn masked_token(&self) -> String {
        if self.access_token.len() <= 8 {
            "****".into()
        } else {
            format!(
                "{}…{}",
                &self.access_token[..4],
                &self.access_token[self.access_token.len() - 4..]
            )
        }
    }

    fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    // ── RPC endpoint (JSON in, JSON out) ────────────────────────────

    /// Call an RPC route: `POST {api_base}/{route}` with a JSON body.
    pub fn rpc<R: DeserializeOwned>(
        &self,
        route: &str,
        body: &serde_json::Value,
    ) -> RestResult<R> {
        let url = format!("{}/{}", self.api_base, route);
        debug!("rpc {route}");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.effective_timeout())
            .json(body)
            .send()?;
        decode(resp)
    }

    // ── Content-upload endpoint ─────────────────────────────────────

    /// Call a content route: the JSON argument object travels in the
    /// ASCII-safe `Dropbox-API-Arg` header, the raw bytes in the body.
    pub fn content_upload<R: DeserializeOwned>(
        &self,
        route: &str,
        api_arg: &serde_json::Value,
        data: Vec<u8>,
    ) -> RestResult<R> {
        let url = format!("{}/{}", self.content_base, route);
        let api_arg_header = http_header_encode(&serde_json::to_string(api_arg)?);
        debug!("content upload {route} ({} bytes)", data.len());
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("Dropbox-API-Arg", api_arg_header)
            .timeout(self.effective_timeout())
            .body(data)
            .send()?;
        decode(resp)
    }

    /// Like [`content_upload`](Self::content_upload) for routes whose
    /// success response carries no payload (`upload_session/append_v2`).
    pub fn content_upload_discard(
        &self,
        route: &str,
        api_arg: &serde_json::Value,
        data: Vec<u8>,
    ) -> RestResult<()> {
        let url = format!("{}/{}", self.content_base, route);
        let api_arg_header = http_header_encode(&serde_json::to_string(api_arg)?);
        debug!("content upload {route} ({} bytes)", data.len());
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header("Dropbox-API-Arg", api_arg_header)
            .timeout(self.effective_timeout())
            .body(data)
            .send()?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text()?;
            Err(RestError::from_api_response(status.as_u16(), &body))
        }
    }
}

/// Map a response: 2xx → decoded payload, anything else → [`RestError`].
fn decode<R: DeserializeOwned>(resp: Response) -> RestResult<R> {
    let status = resp.status();
    let body = resp.text()?;

    if status.is_success() {
        serde_json::from_str(&body).map_err(|e| {
            RestError::protocol(format!("Failed to parse API response: {e} — body: {body}"))
        })
    } else {
        Err(RestError::from_api_response(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_token() {
        let err = RestClient::new("").unwrap_err();
        assert_eq!(err.kind, crate::error::RestErrorKind::AuthFailed);
    }

    #[test]
    fn new_accepts_valid_token() {
        let c = RestClient::new("sl.abc123def456").unwrap();
        assert!(c.masked_token().starts_with("sl.a"));
    }

    #[test]
    fn masked_token_short() {
        let c = RestClient::new("tiny").unwrap();
        assert_eq!(c.masked_token(), "****");
    }

    #[test]
    fn masked_token_long() {
        let c = RestClient::new("sl.abcdef12345678").unwrap();
        let m = c.masked_token();
        assert!(m.starts_with("sl.a"));
        assert!(m.ends_with("5678"));
        assert!(m.contains('…'));
    }

    #[test]
    fn debug_format_hides_token() {
        let c = RestClient::new("sl.testing12345678").unwrap();
        let dbg = format!("{:?}", c);
        assert!(dbg.contains("RestClient"));
        assert!(!dbg.contains("sl.testing12345678"));
    }

    #[test]
    fn rpc_unreachable_host_is_network_error() {
        // Port 9 refuses the connection; the transport failure must map
        // into a NetworkError rather than escape as a reqwest error.
        let c = RestClient::new("sl.token1234567")
            .unwrap()
            .with_bases("http://127.0.0.1:9/2", "http://127.0.0.1:9/2");
        let err = c
            .rpc::<serde_json::Value>("users/get_current_account", &serde_json::Value::Null)
            .unwrap_err();
        assert_eq!(err.kind, crate::error::RestErrorKind::NetworkError);
    }

    #[test]
    fn timeout_defaults_and_overrides() {
        let mut c = RestClient::new("sl.token1234567").unwrap();
        assert_eq!(c.effective_timeout(), DEFAULT_TIMEOUT);
        c.set_timeout(Some(Duration::from_millis(60_001)));
        assert_eq!(c.effective_timeout(), Duration::from_millis(60_001));
        c.set_timeout(None);
        assert_eq!(c.effective_timeout(), DEFAULT_TIMEOUT);
    }
}
