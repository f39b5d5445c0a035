//! Settings a [`crate::Gatehouse`] is built from.

use crate::error::AuthError;
use crate::verifier::{BearerVerifier, PasswordVerifier, StaticBearerVerifier, StaticPasswordVerifier};
use chrono::Duration;
use gatehouse_core::{ConfigError, GatehouseConfig};
use gatehouse_token::SigningSecret;
use std::sync::Arc;

/// Everything needed to authenticate requests and issue sessions.
///
/// Settings are consumed by [`crate::Gatehouse::new`]; there is no way to
/// change them afterwards.
pub struct GatehouseSettings {
    pub(crate) secret: SigningSecret,
    pub(crate) domain: String,
    pub(crate) token_lifetime: Duration,
    pub(crate) password_verifier: Option<Arc<dyn PasswordVerifier>>,
    pub(crate) bearer_verifier: Option<Arc<dyn BearerVerifier>>,
}

impl GatehouseSettings {
    /// Create settings with no external verifiers.
    pub fn new(
        secret: impl Into<Vec<u8>>,
        domain: impl Into<String>,
        token_lifetime: Duration,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            secret: SigningSecret::new(secret)?,
            domain: domain.into(),
            token_lifetime,
            password_verifier: None,
            bearer_verifier: None,
        })
    }

    /// Verify Basic credentials with `verifier`.
    pub fn with_password_verifier(mut self, verifier: impl PasswordVerifier + 'static) -> Self {
        self.password_verifier = Some(Arc::new(verifier));
        self
    }

    /// Verify Bearer credentials with `verifier` instead of session tokens.
    pub fn with_bearer_verifier(mut self, verifier: impl BearerVerifier + 'static) -> Self {
        self.bearer_verifier = Some(Arc::new(verifier));
        self
    }

    /// Build settings from a configuration file.
    ///
    /// Configured users back the Basic scheme. Configured bearer tokens
    /// back the Bearer scheme; without any, Bearer falls back to
    /// self-issued session tokens.
    pub fn from_config(config: &GatehouseConfig) -> Result<Self, AuthError> {
        let lifetime = Duration::from_std(config.lifetime()?).map_err(|e| {
            ConfigError::Config(format!("token_lifetime out of range: {}", e))
        })?;

        let mut settings = Self::new(config.resolve_secret()?, config.domain.clone(), lifetime)?;

        if !config.users.is_empty() {
            let verifier = StaticPasswordVerifier::from_users(&config.users)?;
            tracing::debug!(users = verifier.len(), "basic authentication enabled");
            settings = settings.with_password_verifier(verifier);
        }

        let tokens = config.resolved_bearer_tokens();
        if !tokens.is_empty() {
            tracing::debug!(tokens = tokens.len(), "static bearer tokens enabled");
            settings = settings.with_bearer_verifier(StaticBearerVerifier::new(tokens));
        }

        Ok(settings)
    }
}
