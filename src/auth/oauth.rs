//! auth::oauth
//!
//! OAuth web application flow client for GitHub.
//!
//! # Flow Overview
//!
//! 1. The user opens the authorization URL in a browser
//! 2. GitHub redirects to `http://localhost:{port}/callback?code=...`
//! 3. The code is exchanged for an access token with one form POST
//!
//! Steps 2 and 3 run inside [`crate::auth::CallbackServer`]; this module
//! builds the URLs and performs the exchange.
//!
//! # Example
//!
//! ```ignore
//! use gitutil::auth::OAuthClient;
//!
//! let client = OAuthClient::new("github.com", "Iv1.abc", "secret", 8000);
//! println!("Visit {}", client.authorize_url()?);
//! let token = client.exchange_code("code-from-callback").await?;
//! ```

use std::fmt;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use crate::core::config::DEFAULT_SCOPE;

/// User-Agent header for OAuth requests.
const USER_AGENT: &str = "gitutil-cli";

/// An OAuth access token.
///
/// `Debug` is redacted; use [`AccessToken::expose`] where the raw value
/// is actually needed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Successful token response from GitHub.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The access token.
    pub access_token: AccessToken,

    /// Token type (usually "bearer").
    #[serde(default)]
    pub token_type: Option<String>,

    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Error response from GitHub OAuth endpoints.
#[derive(Debug, Clone, Deserialize)]
struct OAuthError {
    /// Error code.
    error: String,

    /// Human-readable description.
    error_description: Option<String>,
}

/// Request body for the code exchange.
#[derive(Serialize)]
struct ExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// The fixed redirect URI for a local callback port.
pub fn redirect_uri_for(port: u16) -> String {
    format!("http://localhost:{}/callback", port)
}

/// Client for the GitHub OAuth web application flow.
#[derive(Clone)]
pub struct OAuthClient {
    /// HTTP client.
    client: Client,

    /// Scheme and host of the OAuth endpoints (e.g., "https://github.com").
    base_url: String,

    /// OAuth app client id.
    client_id: String,

    /// OAuth app client secret.
    client_secret: String,

    /// Where GitHub sends the browser after authorization.
    redirect_uri: String,

    /// Requested scope.
    scope: String,
}

impl fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scope", &self.scope)
            .finish()
    }
}

impl OAuthClient {
    /// Create a client for `host` with a callback on `localhost:{port}`.
    pub fn new(host: &str, client_id: &str, client_secret: &str, port: u16) -> Self {
        Self {
            client: Client::new(),
            base_url: format!("https://{}", host),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri_for(port),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Point the client at a different endpoint root (scheme + host).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Request a different scope.
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }

    /// Get the authorization endpoint URL.
    fn authorize_endpoint(&self) -> String {
        format!("{}/login/oauth/authorize", self.base_url)
    }

    /// Get the token endpoint URL.
    fn token_url(&self) -> String {
        format!("{}/login/oauth/access_token", self.base_url)
    }

    /// Build headers for OAuth requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(USER_AGENT),
        );
        headers
    }

    /// The URL the user opens to authorize the app.
    ///
    /// Query values are form-encoded, so the redirect URI appears as
    /// `http%3A%2F%2Flocalhost%3A8000%2Fcallback`.
    pub fn authorize_url(&self) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &self.authorize_endpoint(),
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
            ],
        )
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))?;

        Ok(url.to_string())
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::TokenExchangeFailed`] if GitHub returns an OAuth error
    /// - [`AuthError::GitHubApi`] if the response is not understood
    /// - [`AuthError::Network`] if there's a network error
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let request = ExchangeRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code,
            redirect_uri: &self.redirect_uri,
        };

        let response = self
            .client
            .post(self.token_url())
            .headers(self.headers())
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // GitHub answers 200 for both outcomes; the body decides.
        if let Ok(tokens) = serde_json::from_str::<TokenResponse>(&body) {
            tracing::debug!(
                token_type = tokens.token_type.as_deref().unwrap_or("unknown"),
                scope = tokens.scope.as_deref().unwrap_or(""),
                "received access token"
            );
            return Ok(tokens.access_token);
        }

        if let Ok(err) = serde_json::from_str::<OAuthError>(&body) {
            return Err(AuthError::TokenExchangeFailed(format!(
                "{}: {}",
                err.error,
                err.error_description.unwrap_or_default()
            )));
        }

        Err(AuthError::GitHubApi {
            status: status.as_u16(),
            message: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uri_uses_port() {
        assert_eq!(redirect_uri_for(8000), "http://localhost:8000/callback");
        assert_eq!(redirect_uri_for(9123), "http://localhost:9123/callback");
    }

    #[test]
    fn token_url_format() {
        let client = OAuthClient::new("github.com", "id", "secret", 8000);
        assert_eq!(
            client.token_url(),
            "https://github.com/login/oauth/access_token"
        );
    }

    #[test]
    fn github_enterprise_urls() {
        let client = OAuthClient::new("github.example.com", "id", "secret", 8000);
        assert_eq!(
            client.token_url(),
            "https://github.example.com/login/oauth/access_token"
        );
        assert!(client
            .authorize_url()
            .unwrap()
            .starts_with("https://github.example.com/login/oauth/authorize?"));
    }

    #[test]
    fn authorize_url_encodes_redirect() {
        let client = OAuthClient::new("github.com", "Iv1.abc", "secret", 8000);
        let url = client.authorize_url().unwrap();

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=Iv1.abc"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fcallback"));
        assert!(url.contains("scope=repo"));
    }

    #[test]
    fn with_base_url_trims_trailing_slash() {
        let client =
            OAuthClient::new("github.com", "id", "secret", 8000).with_base_url("http://127.0.0.1:1/");
        assert_eq!(
            client.token_url(),
            "http://127.0.0.1:1/login/oauth/access_token"
        );
    }

    #[test]
    fn with_scope_changes_url() {
        let client = OAuthClient::new("github.com", "id", "secret", 8000).with_scope("read:user");
        assert!(client.authorize_url().unwrap().contains("scope=read%3Auser"));
    }

    #[test]
    fn headers_include_accept_json() {
        let client = OAuthClient::new("github.com", "id", "secret", 8000);
        let headers = client.headers();
        assert_eq!(
            headers.get(ACCEPT).map(|v| v.to_str().ok()),
            Some(Some("application/json"))
        );
    }

    #[test]
    fn debug_redacts_secret() {
        let client = OAuthClient::new("github.com", "id", "super-secret", 8000);
        let debug = format!("{:?}", client);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("gho_abcdef");
        assert_eq!(format!("{:?}", token), "AccessToken([REDACTED])");
        assert_eq!(token.expose(), "gho_abcdef");
    }

    #[test]
    fn token_response_deserialize() {
        let json = r#"{
            "access_token": "gho_test_token",
            "token_type": "bearer",
            "scope": "repo"
        }"#;

        let response: TokenResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(response.access_token.expose(), "gho_test_token");
        assert_eq!(response.token_type.as_deref(), Some("bearer"));
        assert_eq!(response.scope.as_deref(), Some("repo"));
    }

    #[test]
    fn error_response_is_not_a_token() {
        let json = r#"{
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }"#;

        assert!(serde_json::from_str::<TokenResponse>(json).is_err());
        let error: OAuthError = serde_json::from_str(json).expect("parse");
        assert_eq!(error.error, "bad_verification_code");
    }
}
