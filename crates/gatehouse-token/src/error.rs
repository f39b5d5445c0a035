//! Error types for the token crate.

use thiserror::Error;

/// Errors that can occur while issuing or validating session tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature does not match, or the token could not be trusted.
    #[error("invalid token")]
    InvalidToken,

    /// Token is not a well-formed signed token.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// Current time is outside the token validity window.
    #[error("token has expired or is not yet valid")]
    TokenExpired,

    /// Token was not issued for this domain.
    #[error("token audience does not include this domain")]
    WrongAudience,

    /// Token was issued by someone else.
    #[error("token issuer does not match this domain")]
    WrongIssuer,

    /// Failed to sign a token.
    #[error("failed to sign token: {0}")]
    Signature(String),

    /// Secret, domain or lifetime is unusable.
    #[error("invalid token configuration: {0}")]
    Configuration(String),
}

impl TokenError {
    /// Stable machine-readable code for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => "token_invalid",
            TokenError::MalformedToken(_) => "token_malformed",
            TokenError::TokenExpired => "token_expired",
            TokenError::WrongAudience => "wrong_audience",
            TokenError::WrongIssuer => "wrong_issuer",
            TokenError::Signature(_) => "signature_error",
            TokenError::Configuration(_) => "token_configuration",
        }
    }
}
