//! Error types for credential dispatch.

use gatehouse_core::ConfigError;
use gatehouse_token::TokenError;
use thiserror::Error;

/// Reasons a request fails authentication.
///
/// The gate answers every variant with the same `401`; the variant itself
/// is only surfaced to logs.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request carried no credential header.
    #[error("no auth header")]
    NoAuthHeader,

    /// Header is not `<scheme> <payload>` or its payload cannot be decoded.
    #[error("invalid auth header")]
    InvalidAuthHeader,

    /// Password pair is malformed.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Scheme selected but no verifier configured for it.
    #[error("authenticator is not initialized")]
    AuthenticatorNotInitialized,

    /// Bearer scheme with an empty token.
    #[error("token is missing")]
    MissingToken,

    /// Scheme is neither Basic nor Bearer.
    #[error("auth type: {0} is not supported")]
    UnsupportedAuthType(String),

    /// Bearer token that no configured path can check.
    #[error("invalid token or not supported")]
    NotSupported,

    /// Self-issued session token failed validation.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// An external verifier refused the credential.
    #[error(transparent)]
    Rejected(anyhow::Error),

    /// Gatehouse could not be built from configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AuthError {
    /// Stable machine-readable code for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::NoAuthHeader => "no_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AuthenticatorNotInitialized => "authenticator_not_initialized",
            AuthError::MissingToken => "missing_token",
            AuthError::UnsupportedAuthType(_) => "unsupported_auth_type",
            AuthError::NotSupported => "not_supported",
            AuthError::Token(e) => e.kind(),
            AuthError::Rejected(_) => "rejected",
            AuthError::Config(_) => "configuration",
        }
    }
}
