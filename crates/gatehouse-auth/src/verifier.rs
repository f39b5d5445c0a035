//! Verifier capabilities for the Basic and Bearer schemes.
//!
//! The two schemes are independent: a deployment may configure either,
//! both, or neither. Errors returned by a verifier are passed through the
//! dispatcher without modification.

use argon2::Argon2;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordVerifier as _;
use async_trait::async_trait;
use gatehouse_core::{ConfigError, UserConfig};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// Checks a username/password pair.
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    async fn check_password(&self, username: &str, password: &str) -> anyhow::Result<()>;
}

/// Checks an opaque bearer token.
#[async_trait]
pub trait BearerVerifier: Send + Sync {
    async fn check_token(&self, token: &str) -> anyhow::Result<()>;
}

enum StoredPassword {
    Plain(String),
    /// Argon2 PHC string, already known to parse.
    Hash(String),
}

/// Password verifier backed by the users listed in configuration.
pub struct StaticPasswordVerifier {
    users: HashMap<String, StoredPassword>,
}

impl StaticPasswordVerifier {
    /// Build from configured users. A hash wins over a plaintext password.
    pub fn from_users(users: &[UserConfig]) -> Result<Self, ConfigError> {
        let mut stored = HashMap::with_capacity(users.len());

        for user in users {
            let password = if let Some(hash) = &user.password_hash {
                PasswordHash::new(hash).map_err(|e| {
                    ConfigError::Config(format!(
                        "user '{}' has an invalid password_hash: {}",
                        user.username, e
                    ))
                })?;
                StoredPassword::Hash(hash.clone())
            } else if let Some(password) = user.get_password() {
                StoredPassword::Plain(password)
            } else {
                return Err(ConfigError::Config(format!(
                    "user '{}' has no password, password_env or password_hash",
                    user.username
                )));
            };

            stored.insert(user.username.clone(), password);
        }

        Ok(Self { users: stored })
    }

    /// Number of configured users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl PasswordVerifier for StaticPasswordVerifier {
    async fn check_password(&self, username: &str, password: &str) -> anyhow::Result<()> {
        match self.users.get(username) {
            None => anyhow::bail!("user not found"),
            Some(StoredPassword::Plain(expected)) => {
                if !constant_time_eq(expected, password) {
                    anyhow::bail!("invalid credentials");
                }
                Ok(())
            }
            Some(StoredPassword::Hash(hash)) => {
                let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .map_err(|_| anyhow::anyhow!("invalid credentials"))
            }
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Bearer verifier accepting a fixed set of opaque tokens.
pub struct StaticBearerVerifier {
    tokens: Vec<String>,
}

impl StaticBearerVerifier {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

#[async_trait]
impl BearerVerifier for StaticBearerVerifier {
    async fn check_token(&self, token: &str) -> anyhow::Result<()> {
        // No early exit: every entry is compared.
        let accepted = self
            .tokens
            .iter()
            .fold(false, |found, known| constant_time_eq(known, token) | found);

        if accepted {
            Ok(())
        } else {
            anyhow::bail!("invalid token")
        }
    }
}
