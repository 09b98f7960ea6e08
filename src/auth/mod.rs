//! auth - GitHub OAuth web application flow
//!
//! Acquires a GitHub access token by sending the user to the authorization
//! page and catching the redirect on a local listener.
//!
//! # Components
//!
//! - [`OAuthClient`] - builds the authorization URL and exchanges codes
//! - [`CallbackServer`] - serves `/callback` until one code is exchanged
//! - [`AccessToken`] - token newtype with redacted `Debug`
//!
//! # Security
//!
//! Tokens and client secrets never appear in logs, error messages, or
//! `Debug` output. The token is shown only where the user asked for it:
//! the command's stdout and the browser response.
//!
//! # Example
//!
//! ```ignore
//! use gitutil::auth::{CallbackServer, OAuthClient};
//! use std::time::Duration;
//!
//! let client = OAuthClient::new("github.com", "Iv1.abc", "secret", 8000);
//! println!("Visit {}", client.authorize_url()?);
//! let server = CallbackServer::bind("127.0.0.1:8000".parse()?).await?;
//! let token = server.wait_for_token(client, Duration::from_secs(300)).await?;
//! ```

mod callback;
mod errors;
mod oauth;

pub use callback::{extract_code, extract_error, CallbackServer, CALLBACK_PATH};
pub use errors::AuthError;
pub use oauth::{redirect_uri_for, AccessToken, OAuthClient, TokenResponse};
