//! auth::callback
//!
//! Local HTTP listener that receives the OAuth redirect.
//!
//! The listener serves `GET /callback` until one request carrying an
//! authorization code has been exchanged for a token, or GitHub reports
//! an `error` such as `access_denied`. Requests with neither get a 400 and
//! the listener keeps waiting. The response is written to the browser
//! before the server shuts down.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};

use super::errors::AuthError;
use super::oauth::{AccessToken, OAuthClient};

/// Path GitHub redirects to.
pub const CALLBACK_PATH: &str = "/callback";

type TokenResult = Result<AccessToken, AuthError>;

/// Pull the authorization code out of a raw query string.
///
/// The first `&`-separated parameter that starts with `code=` wins, and the
/// value ends at the next `=`. No percent-decoding is applied. An empty
/// value counts as absent.
pub fn extract_code(query: &str) -> Option<&str> {
    query_param(query, "code")
}

/// The `error` parameter GitHub sends when authorization is refused.
pub fn extract_error(query: &str) -> Option<&str> {
    query_param(query, "error")
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .find(|param| {
            param
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('='))
        })
        .and_then(|param| param.split('=').nth(1))
        .filter(|value| !value.is_empty())
}

struct CallbackState {
    client: OAuthClient,
    result: Mutex<Option<oneshot::Sender<TokenResult>>>,
    shutdown: Arc<Notify>,
}

impl CallbackState {
    /// Take the single result slot. Only the first caller gets it.
    fn claim(&self) -> Option<oneshot::Sender<TokenResult>> {
        match self.result.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

async fn handle_callback(
    State(state): State<Arc<CallbackState>>,
    RawQuery(query): RawQuery,
) -> (StatusCode, String) {
    let query = query.unwrap_or_default();

    let Some(code) = extract_code(&query) else {
        if let Some(error) = extract_error(&query) {
            return refuse(&state, error);
        }
        tracing::warn!("callback request without an authorization code; still waiting");
        return (
            StatusCode::BAD_REQUEST,
            "Missing authorization code.".to_string(),
        );
    };

    let Some(sender) = state.claim() else {
        return (
            StatusCode::CONFLICT,
            "Authorization already completed.".to_string(),
        );
    };

    tracing::debug!("exchanging authorization code");
    let outcome = state.client.exchange_code(code).await;

    let response = match &outcome {
        Ok(token) => (StatusCode::OK, format!("OAuth2 token: {}", token.expose())),
        Err(e) => (StatusCode::BAD_GATEWAY, format!("Token exchange failed: {}", e)),
    };

    // Receiver is gone only if the waiter already timed out.
    let _ = sender.send(outcome);
    state.shutdown.notify_one();

    response
}

/// End the wait with the error GitHub redirected with.
fn refuse(state: &CallbackState, error: &str) -> (StatusCode, String) {
    let Some(sender) = state.claim() else {
        return (
            StatusCode::CONFLICT,
            "Authorization already completed.".to_string(),
        );
    };

    tracing::debug!(error = %error, "authorization refused");
    let _ = sender.send(Err(AuthError::TokenExchangeFailed(format!(
        "authorization refused: {}",
        error
    ))));
    state.shutdown.notify_one();

    (
        StatusCode::BAD_REQUEST,
        format!("Authorization failed: {}", error),
    )
}

/// A bound callback listener that has not started serving yet.
pub struct CallbackServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl CallbackServer {
    /// Bind the listener. Use port 0 to let the OS pick one.
    pub async fn bind(addr: SocketAddr) -> Result<Self, AuthError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AuthError::CallbackListener(format!("failed to bind {}: {}", addr, e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AuthError::CallbackListener(e.to_string()))?;

        Ok(Self { listener, addr })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until one code has been exchanged or `timeout` elapses.
    ///
    /// Returns after the browser response has been written and the
    /// listener has stopped.
    pub async fn wait_for_token(
        self,
        client: OAuthClient,
        timeout: Duration,
    ) -> Result<AccessToken, AuthError> {
        let (tx, rx) = oneshot::channel();
        let shutdown = Arc::new(Notify::new());
        let state = Arc::new(CallbackState {
            client,
            result: Mutex::new(Some(tx)),
            shutdown: Arc::clone(&shutdown),
        });

        let app = Router::new()
            .route(CALLBACK_PATH, get(handle_callback))
            .with_state(state);

        tracing::debug!(addr = %self.addr, "callback listener started");

        let signal = Arc::clone(&shutdown);
        let server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async move { signal.notified().await })
                .await
        });

        let outcome = tokio::time::timeout(timeout, rx).await;

        shutdown.notify_one();
        match server.await {
            Ok(Ok(())) => tracing::debug!("callback listener stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "callback listener error"),
            Err(e) => tracing::warn!(error = %e, "callback listener task failed"),
        }

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AuthError::CallbackClosed),
            Err(_) => Err(AuthError::CallbackTimeout(timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_code_first_param() {
        assert_eq!(extract_code("code=abc123"), Some("abc123"));
        assert_eq!(extract_code("code=abc123&state=xyz"), Some("abc123"));
    }

    #[test]
    fn extracts_code_later_param() {
        assert_eq!(extract_code("state=xyz&code=abc123"), Some("abc123"));
    }

    #[test]
    fn first_code_wins() {
        assert_eq!(extract_code("code=one&code=two"), Some("one"));
    }

    #[test]
    fn missing_or_empty_code() {
        assert_eq!(extract_code(""), None);
        assert_eq!(extract_code("state=xyz"), None);
        assert_eq!(extract_code("code="), None);
        assert_eq!(extract_code("xcode=abc"), None);
    }

    #[test]
    fn extracts_error() {
        assert_eq!(
            extract_error("error=access_denied&error_description=denied"),
            Some("access_denied")
        );
        assert_eq!(extract_error("error_description=x"), None);
        assert_eq!(extract_error("code=abc"), None);
    }

    #[test]
    fn value_stops_at_equals() {
        assert_eq!(extract_code("code=a=b"), Some("a"));
    }

    #[test]
    fn value_is_not_decoded() {
        assert_eq!(extract_code("code=a%2Bb"), Some("a%2Bb"));
    }

    #[tokio::test]
    async fn bind_ephemeral_port() {
        let server = CallbackServer::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_conflict_is_listener_error() {
        let first = CallbackServer::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let result = CallbackServer::bind(first.local_addr()).await;
        assert!(matches!(result, Err(AuthError::CallbackListener(_))));
    }

    #[tokio::test]
    async fn times_out_without_callback() {
        let server = CallbackServer::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let client = OAuthClient::new("github.com", "id", "secret", 8000)
            .with_base_url("http://127.0.0.1:9");

        let result = server
            .wait_for_token(client, Duration::from_millis(100))
            .await;
        assert!(matches!(result, Err(AuthError::CallbackTimeout(_))));
    }
}
