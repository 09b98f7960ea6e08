//! cli::commands::auth
//!
//! Obtain a GitHub OAuth token through the web application flow.
//!
//! # Design
//!
//! The command:
//! - Prints the authorization URL and opens it in the system browser
//! - Listens on `127.0.0.1:<port>` for the redirect to `/callback`
//! - Exchanges the code and prints `Token received: <token>`
//!
//! The token is printed because the user asked for it. It is never logged
//! and never stored.
//!
//! # Credentials
//!
//! Highest precedence first: flags, `GITHUB_CLIENT_ID` /
//! `GITHUB_CLIENT_SECRET`, then `[oauth]` in the config file. A missing
//! secret is prompted for without echo in interactive mode.
//!
//! # Example
//!
//! ```bash
//! gitutil auth --client-id Iv1.abc
//! GITHUB_CLIENT_SECRET=... gitutil auth --no-browser --port 9000
//! ```

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context as _, Result};

use crate::auth::{AccessToken, AuthError, CallbackServer, OAuthClient};
use crate::engine::Context;
use crate::ui::output;
use crate::ui::prompts::{self, PromptError};

/// Environment variable for the OAuth client id.
pub const CLIENT_ID_ENV: &str = "GITHUB_CLIENT_ID";

/// Environment variable for the OAuth client secret.
pub const CLIENT_SECRET_ENV: &str = "GITHUB_CLIENT_SECRET";

/// Flags accepted by the auth command.
#[derive(Default)]
pub struct AuthArgs {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub port: Option<u16>,
    pub timeout: Option<u64>,
    pub no_browser: bool,
}

/// Fully resolved settings for one token acquisition.
struct AuthSettings {
    host: String,
    client_id: String,
    client_secret: String,
    port: u16,
    scope: String,
    timeout: Duration,
    open_browser: bool,
}

/// First non-empty value in precedence order.
fn pick(flag: Option<String>, env: Option<String>, config: Option<&str>) -> Option<String> {
    flag.into_iter()
        .chain(env)
        .chain(config.map(str::to_string))
        .find(|value| !value.trim().is_empty())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl AuthSettings {
    fn resolve(ctx: &Context, args: AuthArgs) -> Result<Self, AuthError> {
        let config = &ctx.config;

        let client_id = pick(
            args.client_id,
            env_var(CLIENT_ID_ENV),
            config.oauth_client_id(),
        )
        .ok_or_else(|| AuthError::MissingCredentials("client id".to_string()))?;

        let client_secret = match pick(
            args.client_secret,
            env_var(CLIENT_SECRET_ENV),
            config.oauth_client_secret(),
        ) {
            Some(secret) => secret,
            None => prompt_secret(ctx.interactive)?,
        };

        let timeout = match args.timeout {
            Some(0) | None => config.callback_timeout(),
            Some(secs) => Duration::from_secs(secs),
        };

        Ok(Self {
            host: config.oauth_host().to_string(),
            client_id,
            client_secret,
            port: args.port.unwrap_or_else(|| config.oauth_port()),
            scope: config.oauth_scope().to_string(),
            timeout,
            open_browser: !args.no_browser,
        })
    }
}

fn prompt_secret(interactive: bool) -> Result<String, AuthError> {
    match prompts::password("GitHub OAuth client secret: ", interactive) {
        Ok(secret) if !secret.trim().is_empty() => Ok(secret),
        Ok(_) | Err(PromptError::NotInteractive(_)) | Err(PromptError::EndOfInput) => {
            Err(AuthError::MissingCredentials("client secret".to_string()))
        }
        Err(PromptError::IoError(e)) => Err(AuthError::MissingCredentials(format!(
            "client secret (prompt failed: {})",
            e
        ))),
    }
}

/// Run the auth command.
pub fn auth(ctx: &Context, args: AuthArgs) -> Result<()> {
    let settings = AuthSettings::resolve(ctx, args)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
    let token = runtime.block_on(acquire(&settings))?;

    output::emit(format!("Token received: {}", token.expose()));
    Ok(())
}

async fn acquire(settings: &AuthSettings) -> Result<AccessToken, AuthError> {
    let client = OAuthClient::new(
        &settings.host,
        &settings.client_id,
        &settings.client_secret,
        settings.port,
    )
    .with_scope(&settings.scope);
    let url = client.authorize_url()?;

    let server =
        CallbackServer::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, settings.port))).await?;

    output::emit("Open this URL in your browser to authorize:");
    output::emit(&url);

    if settings.open_browser {
        if let Err(e) = open::that_detached(&url) {
            tracing::warn!(error = %e, "could not open a browser; open the URL manually");
        }
    }

    tracing::info!(
        port = settings.port,
        timeout_secs = settings.timeout.as_secs(),
        "waiting for the authorization callback"
    );

    server.wait_for_token(client, settings.timeout).await
}
