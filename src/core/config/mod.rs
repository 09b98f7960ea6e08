//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! Searched in order; the first existing file wins:
//! 1. `$GITUTIL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitutil/config.toml`
//! 3. `~/.gitutil/config.toml`
//!
//! A missing file is not an error: defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use gitutil::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("OAuth callback port: {}", config.oauth_port());
//! println!("Strict exit codes: {}", config.strict());
//! ```

pub mod schema;

pub use schema::{CommitConfig, GlobalConfig, OAuthConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::git::Identity;

/// Default GitHub host.
pub const DEFAULT_HOST: &str = "github.com";

/// Default local callback port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default OAuth scope.
pub const DEFAULT_SCOPE: &str = "repo";

/// Default wait for the browser callback.
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 300;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied by the accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read,
    /// parsed, or validated.
    pub fn load() -> Result<Config, ConfigError> {
        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        global.validate()?;

        Ok(Config {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an already-parsed schema that has no backing file.
    pub fn from_global(global: GlobalConfig) -> Config {
        Config { global, path: None }
    }

    /// Find the first existing config file.
    fn locate() -> Option<PathBuf> {
        Self::candidates().into_iter().find(|p| p.exists())
    }

    /// Candidate config paths in precedence order.
    pub fn candidates() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("GITUTIL_CONFIG") {
            paths.push(PathBuf::from(path));
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_home).join("gitutil/config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gitutil/config.toml"));
        }

        paths
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Whether failed commands exit non-zero.
    ///
    /// Defaults to `false`: failures are logged and the process exits 0.
    pub fn strict(&self) -> bool {
        self.global.strict.unwrap_or(false)
    }

    fn oauth(&self) -> Option<&OAuthConfig> {
        self.global.oauth.as_ref()
    }

    /// GitHub host for the OAuth endpoints.
    pub fn oauth_host(&self) -> &str {
        self.oauth()
            .and_then(|o| o.host.as_deref())
            .unwrap_or(DEFAULT_HOST)
    }

    /// Configured OAuth client id, if any.
    pub fn oauth_client_id(&self) -> Option<&str> {
        self.oauth().and_then(|o| o.client_id.as_deref())
    }

    /// Configured OAuth client secret, if any.
    pub fn oauth_client_secret(&self) -> Option<&str> {
        self.oauth().and_then(|o| o.client_secret.as_deref())
    }

    /// Local callback port.
    pub fn oauth_port(&self) -> u16 {
        self.oauth().and_then(|o| o.port).unwrap_or(DEFAULT_PORT)
    }

    /// Requested OAuth scope.
    pub fn oauth_scope(&self) -> &str {
        self.oauth()
            .and_then(|o| o.scope.as_deref())
            .unwrap_or(DEFAULT_SCOPE)
    }

    /// How long to wait for the browser callback.
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(
            self.oauth()
                .and_then(|o| o.callback_timeout_secs)
                .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_SECS),
        )
    }

    /// Fallback commit identity, when both fields are configured.
    pub fn commit_identity(&self) -> Option<Identity> {
        let commit = self.global.commit.as_ref()?;
        Some(Identity {
            name: commit.author_name.clone()?,
            email: commit.author_email.clone()?,
        })
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();

        assert!(!config.strict());
        assert_eq!(config.oauth_host(), "github.com");
        assert_eq!(config.oauth_port(), 8000);
        assert_eq!(config.oauth_scope(), "repo");
        assert_eq!(config.callback_timeout(), Duration::from_secs(300));
        assert!(config.oauth_client_id().is_none());
        assert!(config.commit_identity().is_none());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");

        fs::write(
            &config_path,
            r#"
            strict = true

            [oauth]
            client_id = "Iv1.abc"
            port = 9123
            callback_timeout_secs = 30

            [commit]
            author_name = "Jane"
            author_email = "jane@example.com"
            "#,
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();

        assert!(config.strict());
        assert_eq!(config.oauth_client_id(), Some("Iv1.abc"));
        assert_eq!(config.oauth_port(), 9123);
        assert_eq!(config.callback_timeout(), Duration::from_secs(30));
        assert_eq!(
            config.commit_identity(),
            Some(Identity {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
            })
        );
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "strict = [").unwrap();

        let result = Config::load_from(&config_path);
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[oauth]\nport = 0\n").unwrap();

        let result = Config::load_from(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(&temp.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn home_candidate_is_last() {
        let candidates = Config::candidates();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                candidates.last(),
                Some(&home.join(".gitutil/config.toml"))
            );
        }
    }
}
