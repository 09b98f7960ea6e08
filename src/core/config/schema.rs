//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! strict = false
//!
//! [oauth]
//! host = "github.com"
//! client_id = "Iv1.0123456789abcdef"
//! client_secret = "..."
//! port = 8000
//! scope = "repo"
//! callback_timeout_secs = 300
//!
//! [commit]
//! author_name = "Jane Doe"
//! author_email = "jane@example.com"
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing; unknown keys are rejected by serde.

use serde::Deserialize;

use super::ConfigError;

/// Global configuration (user scope).
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Exit non-zero when a command fails
    pub strict: Option<bool>,

    /// GitHub OAuth app settings
    pub oauth: Option<OAuthConfig>,

    /// Commit identity fallback
    pub commit: Option<CommitConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(oauth) = &self.oauth {
            oauth.validate()?;
        }
        if let Some(commit) = &self.commit {
            commit.validate()?;
        }
        Ok(())
    }
}

/// OAuth app settings for the `auth` command.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OAuthConfig {
    /// GitHub host (default: "github.com")
    pub host: Option<String>,

    /// OAuth app client id
    pub client_id: Option<String>,

    /// OAuth app client secret
    pub client_secret: Option<String>,

    /// Local callback port (default: 8000)
    pub port: Option<u16>,

    /// Requested scope (default: "repo")
    pub scope: Option<String>,

    /// Seconds to wait for the browser callback (default: 300)
    pub callback_timeout_secs: Option<u64>,
}

impl OAuthConfig {
    /// Validate the OAuth settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "oauth.host cannot be empty".to_string(),
                ));
            }
        }

        if self.port == Some(0) {
            return Err(ConfigError::InvalidValue(
                "oauth.port must be a fixed port, not 0".to_string(),
            ));
        }

        if self.callback_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "oauth.callback_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Commit identity used when git config has no user.name/user.email.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CommitConfig {
    /// Author and committer name
    pub author_name: Option<String>,

    /// Author and committer email
    pub author_email: Option<String>,
}

impl CommitConfig {
    /// Name and email must be set together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.author_name, &self.author_email) {
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::InvalidValue(
                "commit.author_name and commit.author_email must be set together".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
