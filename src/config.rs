//! Client configuration: TOML file plus environment overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiClient, ServiceError};
use crate::auth::CredentialStore;
use crate::game::{DEFAULT_POINTS_PER_CORRECT, GameRules};

/// Overrides `api_base_url`.
pub const ENV_API_URL: &str = "GLOBETROTTER_API_URL";
/// Overrides `share_url`.
pub const ENV_SHARE_URL: &str = "GLOBETROTTER_SHARE_URL";
/// Overrides `round_delay_ms`.
pub const ENV_ROUND_DELAY_MS: &str = "GLOBETROTTER_ROUND_DELAY_MS";
/// Overrides `credentials_path`.
pub const ENV_CREDENTIALS: &str = "GLOBETROTTER_CREDENTIALS";

/// Settings for the game client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the game service.
    api_base_url: String,

    /// Link included in share messages.
    share_url: String,

    /// How long a resolved round stays on screen, in milliseconds.
    round_delay_ms: u64,

    /// Points for a correct answer.
    points_per_correct: u32,

    /// Per-request timeout, in seconds.
    request_timeout_secs: u64,

    /// Where the signed-in identity is stored.
    credentials_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://globerotter-backend.onrender.com".to_string(),
            share_url: "https://globetrotter.example.com".to_string(),
            round_delay_ms: 2000,
            points_per_correct: DEFAULT_POINTS_PER_CORRECT,
            request_timeout_secs: 10,
            credentials_path: PathBuf::from("globetrotter_auth.toml"),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(api = %config.api_base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the file if given (defaults otherwise) and applies environment
    /// overrides.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No config file; using defaults");
                Self::default()
            }
        };
        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// Takes the lookup as a function so callers other than the process
    /// environment can supply values.
    #[instrument(skip(self, lookup))]
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_API_URL) {
            debug!(url = %url, "API URL overridden");
            self.api_base_url = url;
        }
        if let Some(url) = lookup(ENV_SHARE_URL) {
            self.share_url = url;
        }
        if let Some(delay) = lookup(ENV_ROUND_DELAY_MS) {
            self.round_delay_ms = delay.trim().parse().map_err(|e| {
                ConfigError::new(format!("Invalid {}={:?}: {}", ENV_ROUND_DELAY_MS, delay, e))
            })?;
        }
        if let Some(path) = lookup(ENV_CREDENTIALS) {
            self.credentials_path = PathBuf::from(path);
        }
        if self.points_per_correct == 0 {
            warn!("points_per_correct is 0; every game scores nothing");
        }
        Ok(self)
    }

    /// Scoring and pacing rules for a session.
    pub fn rules(&self) -> GameRules {
        GameRules::default()
            .with_points_per_correct(self.points_per_correct)
            .with_expiry_delay(Duration::from_millis(self.round_delay_ms))
    }

    /// HTTP client for the configured service.
    #[instrument(skip(self), fields(api = %self.api_base_url))]
    pub fn api_client(&self) -> Result<ApiClient, ServiceError> {
        ApiClient::new(
            &self.api_base_url,
            Duration::from_secs(self.request_timeout_secs),
        )
    }

    /// Credential store at the configured path.
    pub fn credential_store(&self) -> CredentialStore {
        CredentialStore::new(&self.credentials_path)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: ClientConfig = toml::from_str("round_delay_ms = 500\n").unwrap();
        assert_eq!(*config.round_delay_ms(), 500);
        assert_eq!(*config.points_per_correct(), 10);
        assert_eq!(
            config.rules().expiry_delay(),
            &Duration::from_millis(500)
        );
    }

    #[test]
    fn test_env_overrides() {
        let config = ClientConfig::default()
            .with_env_overrides(|key| match key {
                ENV_API_URL => Some("http://localhost:9000".to_string()),
                ENV_ROUND_DELAY_MS => Some("750".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.api_base_url(), "http://localhost:9000");
        assert_eq!(*config.round_delay_ms(), 750);
    }

    #[test]
    fn test_bad_delay_rejected() {
        let result = ClientConfig::default().with_env_overrides(|key| {
            (key == ENV_ROUND_DELAY_MS).then(|| "soon".to_string())
        });
        assert!(result.is_err());
    }
}
