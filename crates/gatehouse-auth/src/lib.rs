//! # gatehouse-auth
//!
//! Credential dispatch and request gating for Gatehouse.
//!
//! A request carries one `Authorization` header. The dispatcher parses it,
//! picks the scheme, and routes it:
//!
//! | Scheme | Verified by |
//! |--------|-------------|
//! | `Basic` | the configured [`PasswordVerifier`] |
//! | `Bearer` | the configured [`BearerVerifier`], or self-issued session tokens when none is configured |
//!
//! The [`gate::require_auth`] middleware runs the dispatcher in front of a
//! protected router and answers `401 Unauthorized` on any failure.

pub mod credential;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod settings;
pub mod verifier;

pub use credential::Credential;
pub use dispatch::{Gatehouse, Principal, looks_like_session_token};
pub use error::AuthError;
pub use gate::require_auth;
pub use settings::GatehouseSettings;
pub use verifier::{BearerVerifier, PasswordVerifier, StaticBearerVerifier, StaticPasswordVerifier};
