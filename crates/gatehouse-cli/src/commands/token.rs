//! Session token commands.
//!
//! `gatehouse token issue` - Issue a session token for a subject.
//! `gatehouse token verify` - Verify a session token is valid.

use anyhow::Context;
use chrono::Utc;
use std::fs;
use std::path::Path;

/// Issue a session token signed with the configured secret.
pub fn issue(config_path: &Path, subject: &str, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let gatehouse = super::build_gatehouse(&config)?;

    let session = gatehouse
        .issue_session(subject)
        .with_context(|| format!("Failed to issue session for {}", subject))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("{}", session.access_token);
    }

    Ok(())
}

/// Verify a session token against the configured secret and domain.
pub fn verify(config_path: &Path, token: String) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let gatehouse = super::build_gatehouse(&config)?;

    // Load token from file if it looks like a path
    let token_str = if Path::new(&token).exists() {
        fs::read_to_string(&token)?.trim().to_string()
    } else {
        token
    };

    match gatehouse.validate_session(&token_str) {
        Ok(session) => {
            let remaining = session.expires_in(Utc::now());
            println!("✔ Token is valid");
            println!();
            println!("Token Details:");
            println!("  Subject: {}", session.id);
            println!("  Domain: {}", gatehouse.sessions().domain());
            println!("  Expires: {}", session.expiration_date.to_rfc3339());
            println!("  Remaining: {}s", remaining.num_seconds().max(0));
        }
        Err(e) => {
            println!("✖ Token verification failed: {} ({})", e, e.kind());
            std::process::exit(1);
        }
    }

    Ok(())
}
