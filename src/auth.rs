//! Authorization-code → access-token exchange.
//!
//! One outbound call, made exactly once when a credential is
//! constructed from an authorization code. There is no refresh flow;
//! the resulting token is long-lived and never re-derived.

use crate::args;
use crate::error::{RestError, RestResult};
use crate::types::OAuthTokenResponse;

const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

/// Exchange an authorization code for an access token.
///
/// Returns the bearer token on success; any non-2xx response or
/// malformed body is a [`RestError`]. Never retried automatically.
pub fn exchange_authorization_code(
    app_key: &str,
    app_secret: &str,
    authorization_code: &str,
) -> RestResult<String> {
    exchange_at(TOKEN_URL, app_key, app_secret, authorization_code)
}

fn exchange_at(
    url: &str,
    app_key: &str,
    app_secret: &str,
    authorization_code: &str,
) -> RestResult<String> {
    let client = reqwest::blocking::Client::builder()
        .build()
        .map_err(|e| RestError::network(format!("Failed to build HTTP client: {e}")))?;
    let form = args::build_token_exchange_form(app_key, app_secret, authorization_code);

    let resp = client.post(url).form(&form).send()?;
    let status = resp.status();
    let body = resp.text()?;

    if !status.is_success() {
        return Err(RestError::from_api_response(status.as_u16(), &body));
    }

    let token: OAuthTokenResponse = serde_json::from_str(&body).map_err(|e| {
        RestError::protocol(format!("Failed to parse token response: {e} — body: {body}"))
    })?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_unreachable_host_is_rest_error() {
        // Nothing listens on this port; the transport failure must come
        // back as a RestError, never a panic or raw reqwest error.
        let err = exchange_at("http://127.0.0.1:9/oauth2/token", "key", "secret", "code")
            .unwrap_err();
        assert_eq!(err.kind, crate::error::RestErrorKind::NetworkError);
    }

    #[test]
    fn token_url_is_api_host() {
        assert!(TOKEN_URL.starts_with("https://api.dropboxapi.com/"));
    }
}
