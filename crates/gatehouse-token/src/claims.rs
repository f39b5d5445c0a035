//! Claims carried by a session token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identity claims embedded in a session token.
///
/// Field names on the wire follow the registered JWT claim names and
/// timestamps are whole seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token was issued for.
    #[serde(rename = "sub")]
    pub subject: String,

    /// When the token was issued.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Token is not valid before this instant.
    #[serde(rename = "nbf", with = "chrono::serde::ts_seconds")]
    pub not_before: DateTime<Utc>,

    /// Token is not valid after this instant.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    /// Domain that issued the token.
    #[serde(rename = "iss")]
    pub issuer: String,

    /// Domains the token is intended for.
    #[serde(rename = "aud", deserialize_with = "one_or_many")]
    pub audience: Vec<String>,
}

impl Claims {
    /// Whether `now` falls inside `[not_before, expires_at]`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now <= self.expires_at
    }

    /// Whether `domain` is one of the intended audiences.
    pub fn accepts_audience(&self, domain: &str) -> bool {
        self.audience.iter().any(|aud| aud == domain)
    }
}

/// `aud` may be a single string or an array of strings.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(auds) => auds,
    })
}
