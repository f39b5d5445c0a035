//! Parsing of the credential header.

use crate::error::AuthError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Scheme tag for username/password credentials.
pub const BASIC: &str = "Basic";

/// Scheme tag for token credentials.
pub const BEARER: &str = "Bearer";

/// A credential extracted from a `<scheme> <payload>` header value.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Decoded `username:password` pair.
    Basic { username: String, password: String },
    /// Raw bearer token, possibly empty.
    Bearer(String),
    /// Any other scheme tag.
    Unsupported(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Credential::Bearer(_) => f.write_str("Bearer(..)"),
            Credential::Unsupported(scheme) => f.debug_tuple("Unsupported").field(scheme).finish(),
        }
    }
}

impl Credential {
    /// Parse a header value.
    ///
    /// The value must split on a single space into exactly two parts.
    /// Scheme tags are matched exactly and case-sensitively.
    pub fn parse(header: &str) -> Result<Self, AuthError> {
        if header.is_empty() {
            return Err(AuthError::NoAuthHeader);
        }

        let parts: Vec<&str> = header.split(' ').collect();
        let [scheme, payload] = parts.as_slice() else {
            return Err(AuthError::InvalidAuthHeader);
        };

        match *scheme {
            BASIC => decode_basic(payload),
            BEARER => Ok(Credential::Bearer(payload.to_string())),
            other => Ok(Credential::Unsupported(other.to_string())),
        }
    }

    /// Scheme tag this credential was presented with.
    pub fn scheme(&self) -> &str {
        match self {
            Credential::Basic { .. } => BASIC,
            Credential::Bearer(_) => BEARER,
            Credential::Unsupported(scheme) => scheme,
        }
    }
}

/// Decode a base64 `username:password` payload, splitting at the first colon.
fn decode_basic(payload: &str) -> Result<Credential, AuthError> {
    let data = STANDARD
        .decode(payload)
        .map_err(|_| AuthError::InvalidAuthHeader)?;
    let data = String::from_utf8(data).map_err(|_| AuthError::InvalidCredentials)?;

    let (username, password) = data.split_once(':').ok_or(AuthError::InvalidAuthHeader)?;

    Ok(Credential::Basic {
        username: username.to_string(),
        password: password.to_string(),
    })
}
