//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SUNBIRD_API_URL` - Base URL of the Sunbird backend (e.g.,
//!   `https://shop.example.com/api`)
//!
//! ## Optional
//! - `SUNBIRD_STATE_DIR` - Directory for persisted client state
//!   (default: `$HOME/.sunbird`)
//! - `SUNBIRD_HTTP_TIMEOUT_SECS` - Request timeout in seconds
//!   (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const STATE_FILE_NAME: &str = "state.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Sunbird client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend. Always ends with a trailing slash so
    /// relative paths join under it.
    pub base_url: Url,
    /// Directory for persisted state (session, cart).
    pub state_dir: PathBuf,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `SUNBIRD_API_URL` is missing or unparseable,
    /// or if an optional variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("SUNBIRD_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("SUNBIRD_API_URL".to_owned()))?;
        let base_url = Self::parse_base_url(&raw_url)?;

        let state_dir = match std::env::var("SUNBIRD_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::var("HOME")
                .map(|home| PathBuf::from(home).join(".sunbird"))
                .map_err(|_| ConfigError::MissingEnvVar("SUNBIRD_STATE_DIR".to_owned()))?,
        };

        let timeout_secs = match std::env::var("SUNBIRD_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|err| {
                ConfigError::InvalidEnvVar("SUNBIRD_HTTP_TIMEOUT_SECS".to_owned(), err.to_string())
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            state_dir,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a config programmatically (tests, embedding).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` does not parse as an absolute URL.
    pub fn new(base_url: &str, state_dir: PathBuf) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: Self::parse_base_url(base_url)?,
            state_dir,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Path of the persisted state file inside the state directory.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.state_dir.join(STATE_FILE_NAME)
    }

    fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
        // A trailing slash makes Url::join treat the last segment as a
        // directory; without it "api".join("products") drops "api".
        let normalized = if raw.ends_with('/') {
            raw.to_owned()
        } else {
            format!("{raw}/")
        };

        Url::parse(&normalized)
            .map_err(|err| ConfigError::InvalidEnvVar("SUNBIRD_API_URL".to_owned(), err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_a_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8080/api", PathBuf::from("/tmp")).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/");

        let joined = config.base_url.join("products").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8080/api/products");
    }

    #[test]
    fn existing_trailing_slash_is_kept() {
        let config = ClientConfig::new("http://localhost:8080/api/", PathBuf::from("/tmp")).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/");
    }

    #[test]
    fn relative_url_is_rejected() {
        assert!(ClientConfig::new("/api", PathBuf::from("/tmp")).is_err());
    }

    #[test]
    fn state_file_lives_in_state_dir() {
        let config = ClientConfig::new("http://x.test", PathBuf::from("/var/lib/sunbird")).unwrap();
        assert_eq!(
            config.state_file(),
            PathBuf::from("/var/lib/sunbird/state.json")
        );
    }
}
