//! Credential dispatch.
//!
//! One pass per request, no state kept between requests:
//!
//! 1. parse the header into a [`Credential`]
//! 2. route on the scheme tag
//! 3. hand the payload to the matching verifier, or to the session
//!    validator when a Bearer token looks self-issued

use crate::credential::Credential;
use crate::error::AuthError;
use crate::settings::GatehouseSettings;
use crate::verifier::{BearerVerifier, PasswordVerifier};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use gatehouse_token::{Session, SessionManager, TokenError};
use std::sync::Arc;

/// Bearer tokens must be longer than this to be tried as session tokens.
const SESSION_TOKEN_LEN_THRESHOLD: usize = 100;

/// Whether a bearer token should be tried as a self-issued session token.
///
/// Cheap format sniff, not a security check: a token that passes still has
/// to pass full signature and claim validation.
pub fn looks_like_session_token(token: &str) -> bool {
    token.chars().count() > SESSION_TOKEN_LEN_THRESHOLD && token.contains('.')
}

/// Who a successful check authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// Basic credentials accepted by the password verifier.
    User(String),
    /// Bearer token accepted by the external bearer verifier.
    Bearer,
    /// Self-issued session token.
    Session(Session),
}

impl Principal {
    /// Short label of the path that accepted the credential.
    pub fn method(&self) -> &'static str {
        match self {
            Principal::User(_) => "basic",
            Principal::Bearer => "bearer",
            Principal::Session(_) => "session",
        }
    }
}

/// The authentication gateway: verifiers plus the session issuer.
///
/// Built once at startup and shared as `Arc<Gatehouse>`; every method takes
/// `&self`.
pub struct Gatehouse {
    sessions: SessionManager,
    password_verifier: Option<Arc<dyn PasswordVerifier>>,
    bearer_verifier: Option<Arc<dyn BearerVerifier>>,
}

impl Gatehouse {
    /// Build a gatehouse from settings.
    pub fn new(settings: GatehouseSettings) -> Result<Self, AuthError> {
        let sessions = SessionManager::new(
            &settings.secret,
            settings.domain,
            settings.token_lifetime,
        )?;

        tracing::info!(
            domain = sessions.domain(),
            lifetime_secs = sessions.lifetime().num_seconds(),
            basic = settings.password_verifier.is_some(),
            bearer = settings.bearer_verifier.is_some(),
            "gatehouse initialized"
        );

        Ok(Self {
            sessions,
            password_verifier: settings.password_verifier,
            bearer_verifier: settings.bearer_verifier,
        })
    }

    /// Issue a session token for `subject`.
    pub fn issue_session(&self, subject: &str) -> Result<Session, TokenError> {
        self.sessions.issue(subject)
    }

    /// Validate a self-issued session token.
    pub fn validate_session(&self, token: &str) -> Result<Session, TokenError> {
        self.sessions.validate(token)
    }

    /// Session issuer and validator.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Authenticate a request by its `Authorization` header.
    pub async fn authenticate_request(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let header = match headers.get(AUTHORIZATION) {
            Some(value) => value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?,
            None => return Err(AuthError::NoAuthHeader),
        };

        self.authenticate(header).await
    }

    /// Authenticate a raw credential header value.
    pub async fn authenticate(&self, header: &str) -> Result<Principal, AuthError> {
        let credential = Credential::parse(header)?;
        tracing::trace!(scheme = credential.scheme(), "dispatching credential");

        match credential {
            Credential::Basic { username, password } => {
                self.authenticate_basic(username, &password).await
            }
            Credential::Bearer(token) => self.authenticate_bearer(&token).await,
            Credential::Unsupported(scheme) => Err(AuthError::UnsupportedAuthType(scheme)),
        }
    }

    async fn authenticate_basic(
        &self,
        username: String,
        password: &str,
    ) -> Result<Principal, AuthError> {
        let verifier = self
            .password_verifier
            .as_ref()
            .ok_or(AuthError::AuthenticatorNotInitialized)?;

        verifier
            .check_password(&username, password)
            .await
            .map_err(AuthError::Rejected)?;

        Ok(Principal::User(username))
    }

    async fn authenticate_bearer(&self, token: &str) -> Result<Principal, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        if let Some(verifier) = &self.bearer_verifier {
            verifier.check_token(token).await.map_err(AuthError::Rejected)?;
            return Ok(Principal::Bearer);
        }

        // No external verifier: fall back to our own session tokens.
        if looks_like_session_token(token) {
            let session = self.sessions.validate(token)?;
            return Ok(Principal::Session(session));
        }

        Err(AuthError::NotSupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::Duration;
    use std::collections::HashMap;

    struct TestUsers(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl PasswordVerifier for TestUsers {
        async fn check_password(&self, username: &str, password: &str) -> anyhow::Result<()> {
            match self.0.get(username) {
                Some(expected) if *expected == password => Ok(()),
                Some(_) => anyhow::bail!("invalid credentials"),
                None => anyhow::bail!("user not found"),
            }
        }
    }

    struct TestTokens(HashMap<&'static str, &'static str>);

    #[async_trait]
    impl BearerVerifier for TestTokens {
        async fn check_token(&self, token: &str) -> anyhow::Result<()> {
            match self.0.get(token) {
                Some(&"valid") => Ok(()),
                Some(_) => anyhow::bail!("token is expired or invalid"),
                None => anyhow::bail!("invalid token"),
            }
        }
    }

    fn settings() -> GatehouseSettings {
        GatehouseSettings::new(
            "1c2b79719568a9ba9d3392156bcabcca",
            "test.local",
            Duration::hours(1),
        )
        .unwrap()
    }

    fn test_users() -> TestUsers {
        TestUsers(HashMap::from([("testy", "my_secret_password")]))
    }

    fn test_tokens() -> TestTokens {
        TestTokens(HashMap::from([("123", "valid"), ("456", "expired")]))
    }

    fn full() -> Gatehouse {
        Gatehouse::new(
            settings()
                .with_password_verifier(test_users())
                .with_bearer_verifier(test_tokens()),
        )
        .unwrap()
    }

    fn basic(pair: &str) -> String {
        format!("Basic {}", STANDARD.encode(pair))
    }

    #[test]
    fn test_session_token_heuristic() {
        assert!(!looks_like_session_token("123"));
        assert!(!looks_like_session_token(&"a".repeat(200)));
        assert!(!looks_like_session_token(&format!("{}.", "a".repeat(99))));
        assert!(looks_like_session_token(&format!("{}.", "a".repeat(100))));
    }

    #[tokio::test]
    async fn test_basic_accepted() {
        let principal = full()
            .authenticate(&basic("testy:my_secret_password"))
            .await
            .unwrap();
        assert_eq!(principal, Principal::User("testy".to_string()));
        assert_eq!(principal.method(), "basic");
    }

    #[tokio::test]
    async fn test_basic_rejection_is_propagated() {
        let err = full().authenticate(&basic("testy:nope")).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert_eq!(err.to_string(), "invalid credentials");

        let err = full().authenticate(&basic("nobody:x")).await.unwrap_err();
        assert_eq!(err.to_string(), "user not found");
    }

    #[tokio::test]
    async fn test_basic_without_verifier() {
        let gatehouse = Gatehouse::new(settings().with_bearer_verifier(test_tokens())).unwrap();
        assert!(matches!(
            gatehouse.authenticate(&basic("testy:my_secret_password")).await,
            Err(AuthError::AuthenticatorNotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_bearer_with_verifier() {
        let gatehouse = full();
        assert_eq!(
            gatehouse.authenticate("Bearer 123").await.unwrap(),
            Principal::Bearer
        );

        let err = gatehouse.authenticate("Bearer 456").await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
        assert_eq!(err.to_string(), "token is expired or invalid");
    }

    #[tokio::test]
    async fn test_bearer_verifier_wins_over_session_tokens() {
        let gatehouse = full();
        let session = gatehouse.issue_session("testy").unwrap();

        let err = gatehouse
            .authenticate(&format!("Bearer {}", session.access_token))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_empty_bearer_token() {
        assert!(matches!(
            full().authenticate("Bearer ").await,
            Err(AuthError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn test_session_fallback() {
        let gatehouse = Gatehouse::new(settings()).unwrap();
        let session = gatehouse.issue_session("testy").unwrap();

        let principal = gatehouse
            .authenticate(&format!("Bearer {}", session.access_token))
            .await
            .unwrap();
        assert_eq!(principal, Principal::Session(session));
    }

    #[tokio::test]
    async fn test_session_fallback_propagates_token_errors() {
        let gatehouse = Gatehouse::new(settings()).unwrap();
        let session = gatehouse.issue_session("testy").unwrap();
        let forged = format!("{}x", session.access_token);

        assert!(matches!(
            gatehouse.authenticate(&format!("Bearer {}", forged)).await,
            Err(AuthError::Token(TokenError::InvalidToken))
        ));
    }

    #[tokio::test]
    async fn test_unrecognized_bearer_without_verifier() {
        let gatehouse = Gatehouse::new(settings()).unwrap();
        assert!(matches!(
            gatehouse.authenticate("Bearer 123").await,
            Err(AuthError::NotSupported)
        ));
    }

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let err = full().authenticate("Weird abc").await.unwrap_err();
        match &err {
            AuthError::UnsupportedAuthType(scheme) => assert_eq!(scheme, "Weird"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Weird"));
    }

    #[tokio::test]
    async fn test_header_errors() {
        let gatehouse = full();
        assert!(matches!(
            gatehouse.authenticate("").await,
            Err(AuthError::NoAuthHeader)
        ));
        assert!(matches!(
            gatehouse.authenticate("Bearer").await,
            Err(AuthError::InvalidAuthHeader)
        ));

        assert!(matches!(
            gatehouse.authenticate_request(&HeaderMap::new()).await,
            Err(AuthError::NoAuthHeader)
        ));
    }
}
