//! Gatehouse configuration.
//!
//! The configuration is read once at startup from a YAML file and never
//! mutated afterwards. Secrets may be given inline or through environment
//! variable references so the file itself can be committed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Top-level configuration file (`gatehouse.yaml`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatehouseConfig {
    /// Domain used as the issuer and sole audience of session tokens.
    pub domain: String,

    /// Lifetime of issued session tokens (e.g. "15m", "1h", "7d").
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime: String,

    /// Signing secret given inline.
    #[serde(default)]
    pub secret: Option<String>,

    /// Environment variable containing the signing secret.
    #[serde(default)]
    pub secret_env: Option<String>,

    /// Bind address for `gatehouse serve`.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Users accepted by the Basic scheme.
    #[serde(default)]
    pub users: Vec<UserConfig>,

    /// Opaque tokens accepted by the Bearer scheme. When empty, Bearer
    /// credentials are checked as self-issued session tokens instead.
    #[serde(default)]
    pub bearer_tokens: Vec<BearerTokenConfig>,
}

/// A user allowed to authenticate with the Basic scheme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub username: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: Option<String>,
    /// Environment variable containing the plaintext password.
    #[serde(default)]
    pub password_env: Option<String>,
    /// Argon2 PHC string, as printed by `gatehouse hash-password`.
    #[serde(default)]
    pub password_hash: Option<String>,
}

impl UserConfig {
    /// Get the plaintext password, checking password_env first.
    pub fn get_password(&self) -> Option<String> {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(password);
        }
        self.password.clone()
    }
}

/// An opaque bearer token accepted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerTokenConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_env: Option<String>,
}

impl BearerTokenConfig {
    /// Get the token, checking token_env first.
    pub fn get_token(&self) -> Option<String> {
        if let Some(env_var) = &self.token_env
            && let Ok(token) = std::env::var(env_var)
        {
            return Some(token);
        }
        self.token.clone()
    }
}

fn default_token_lifetime() -> String {
    "1h".to_string()
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl GatehouseConfig {
    /// Create a configuration with defaults for everything but the domain and secret.
    pub fn new(domain: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            token_lifetime: default_token_lifetime(),
            secret: Some(secret.into()),
            secret_env: None,
            listen: default_listen(),
            users: Vec::new(),
            bearer_tokens: Vec::new(),
        }
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Resolve the signing secret from environment or inline value.
    pub fn resolve_secret(&self) -> Result<String, ConfigError> {
        if let Some(env_var) = &self.secret_env
            && let Ok(secret) = std::env::var(env_var)
        {
            return Ok(secret);
        }

        match &self.secret {
            Some(secret) => Ok(secret.clone()),
            None => Err(ConfigError::Config(
                "no signing secret configured (set `secret` or `secret_env`)".to_string(),
            )),
        }
    }

    /// Parse the configured token lifetime.
    pub fn lifetime(&self) -> Result<Duration, ConfigError> {
        let lifetime = humantime::parse_duration(self.token_lifetime.trim()).map_err(|e| {
            ConfigError::Config(format!(
                "invalid token_lifetime '{}': {}",
                self.token_lifetime, e
            ))
        })?;

        if lifetime.is_zero() {
            return Err(ConfigError::Config(
                "token_lifetime must be positive".to_string(),
            ));
        }

        Ok(lifetime)
    }

    /// Accepted bearer tokens with their environment references resolved.
    pub fn resolved_bearer_tokens(&self) -> Vec<String> {
        self.bearer_tokens
            .iter()
            .filter_map(BearerTokenConfig::get_token)
            .filter(|t| !t.is_empty())
            .collect()
    }
}
