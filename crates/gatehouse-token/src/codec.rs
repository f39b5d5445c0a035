//! Token encoding and decoding.

use crate::claims::Claims;
use crate::error::TokenError;
use crate::secret::SigningSecret;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Signs claim sets into compact HS256 tokens and verifies them back.
///
/// The codec only guarantees integrity. Expiry, audience and issuer are
/// checked by [`crate::SessionManager`] so their error precedence stays in
/// one place.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec for the given secret.
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: secret.encoding_key(),
            decoding: secret.decoding_key(),
            validation,
        }
    }

    /// Sign `claims` into a token string.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signature(e.to_string()))
    }

    /// Verify the signature of `token` and return its claims.
    ///
    /// A signature mismatch is [`TokenError::InvalidToken`]; anything that
    /// is not a well-formed HS256 token is [`TokenError::MalformedToken`].
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidToken,
                _ => TokenError::MalformedToken(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::{DateTime, Duration, Utc};

    fn sample_claims() -> Claims {
        let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        Claims {
            subject: "testy".to_string(),
            issued_at: now,
            not_before: now,
            expires_at: now + Duration::hours(1),
            issuer: "test.local".to_string(),
            audience: vec!["test.local".to_string()],
        }
    }

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&SigningSecret::new(secret).unwrap())
    }

    #[test]
    fn test_encode_and_decode() {
        let codec = codec("1c2b79719568a9ba9d3392156bcabcca");
        let claims = sample_claims();

        let token = codec.encode(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_does_not_check_expiry() {
        let codec = codec("secret");
        let mut claims = sample_claims();
        claims.expires_at = claims.issued_at - Duration::hours(2);

        let token = codec.encode(&claims).unwrap();
        assert!(codec.decode(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = codec("secret-a").encode(&sample_claims()).unwrap();

        let err = codec("secret-b").decode(&token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidToken));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let codec = codec("secret");
        let token = codec.encode(&sample_claims()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let mut value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        value["sub"] = serde_json::json!("admin");
        let forged = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&value).unwrap());

        let tampered = format!("{}.{}.{}", parts[0], forged, parts[2]);
        assert!(matches!(
            codec.decode(&tampered),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec("secret");

        assert!(matches!(
            codec.decode("not-a-token"),
            Err(TokenError::MalformedToken(_))
        ));
        assert!(matches!(
            codec.decode("a.b.c"),
            Err(TokenError::MalformedToken(_))
        ));
    }
}
