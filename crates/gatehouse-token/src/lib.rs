//! # gatehouse-token
//!
//! Self-issued session tokens for Gatehouse.
//!
//! This crate provides functionality for:
//! - Encoding claim sets into HS256-signed compact tokens
//! - Decoding tokens, verifying the signature before any claim is trusted
//! - Issuing sessions for a subject with a configured lifetime
//! - Validating sessions against expiry, audience and issuer
//!
//! Sessions are stateless. Nothing issued here is stored; a token is valid
//! for exactly as long as its signature and validity window say so.

pub mod claims;
pub mod codec;
pub mod error;
pub mod secret;
pub mod session;

pub use claims::Claims;
pub use codec::TokenCodec;
pub use error::TokenError;
pub use secret::SigningSecret;
pub use session::{Session, SessionManager};
