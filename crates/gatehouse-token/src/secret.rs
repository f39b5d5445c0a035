//! Symmetric signing secret.

use crate::error::TokenError;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand::RngCore;
use std::fmt;

/// Shared secret used to sign and verify session tokens.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl SigningSecret {
    /// Wrap raw secret bytes. An empty secret is rejected.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TokenError::Configuration(
                "signing secret must not be empty".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    /// Generate a random 32-byte secret, hex-encoded.
    ///
    /// The hex text itself is meant to be used as the configured secret.
    pub fn generate_hex() -> String {
        let mut rng = rand::rng();
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);

        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub(crate) fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.bytes)
    }

    pub(crate) fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.bytes)
    }
}
