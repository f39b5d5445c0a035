//! Session issuance and validation.

use crate::claims::Claims;
use crate::codec::TokenCodec;
use crate::error::TokenError;
use crate::secret::SigningSecret;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A session handed back to callers. Never stored by Gatehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Signed token string.
    pub access_token: String,
    /// Subject the session belongs to.
    pub id: String,
    /// When the token stops being valid.
    pub expiration_date: DateTime<Utc>,
}

/// Issues and validates self-signed session tokens for one domain.
pub struct SessionManager {
    codec: TokenCodec,
    domain: String,
    lifetime: Duration,
}

impl SessionManager {
    /// Create a session manager.
    ///
    /// `domain` is both the issuer and the only audience of issued tokens.
    pub fn new(
        secret: &SigningSecret,
        domain: impl Into<String>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let domain = domain.into();
        if domain.trim().is_empty() {
            return Err(TokenError::Configuration(
                "domain must not be empty".to_string(),
            ));
        }
        if lifetime <= Duration::zero() {
            return Err(TokenError::Configuration(
                "token lifetime must be positive".to_string(),
            ));
        }

        Ok(Self {
            codec: TokenCodec::new(secret),
            domain,
            lifetime,
        })
    }

    /// Domain used as issuer and audience.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Lifetime of issued tokens.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a session for `subject`, valid from now.
    pub fn issue(&self, subject: &str) -> Result<Session, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a session for `subject` as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<Session, TokenError> {
        // Tokens carry whole seconds: the window start rounds down and the
        // expiry rounds up, so the full lifetime is always covered.
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let expires_at = now
            .checked_add_signed(self.lifetime)
            .and_then(ceil_to_second)
            .ok_or_else(|| TokenError::Signature("time overflow computing expiry".to_string()))?;

        let claims = Claims {
            subject: subject.to_string(),
            issued_at,
            not_before: issued_at,
            expires_at,
            issuer: self.domain.clone(),
            audience: vec![self.domain.clone()],
        };

        let access_token = self.codec.encode(&claims)?;
        tracing::debug!(subject, expires_at = %expires_at, "issued session token");

        Ok(Session {
            access_token,
            id: claims.subject,
            expiration_date: expires_at,
        })
    }

    /// Validate a session token against the current time.
    pub fn validate(&self, token: &str) -> Result<Session, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a session token as if the current time were `now`.
    ///
    /// Checks run in a fixed order and stop at the first failure: signature,
    /// validity window, audience, issuer.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Session, TokenError> {
        let claims = self.codec.decode(token).map_err(|e| {
            tracing::debug!(kind = e.kind(), error = %e, "session token failed decoding");
            TokenError::InvalidToken
        })?;

        if !claims.is_active_at(now) {
            return Err(TokenError::TokenExpired);
        }

        if !claims.accepts_audience(&self.domain) {
            return Err(TokenError::WrongAudience);
        }

        if claims.issuer != self.domain {
            return Err(TokenError::WrongIssuer);
        }

        Ok(Session {
            access_token: token.to_string(),
            id: claims.subject,
            expiration_date: claims.expires_at,
        })
    }
}

impl Session {
    /// Time left until the session expires, negative once it has.
    pub fn expires_in(&self, now: DateTime<Utc>) -> Duration {
        self.expiration_date - now
    }
}

fn ceil_to_second(at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if at.timestamp_subsec_nanos() == 0 {
        return Some(at);
    }
    DateTime::from_timestamp(at.timestamp().checked_add(1)?, 0)
}
