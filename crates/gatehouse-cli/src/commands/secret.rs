//! Secret and password commands.
//!
//! `gatehouse secret generate` - Generate a random signing secret.
//! `gatehouse hash-password` - Hash a password for the configuration file.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use gatehouse_token::SigningSecret;

/// Generate a new signing secret.
pub fn generate() {
    println!("{}", SigningSecret::generate_hex());
    println!();
    println!("Keep this secret secure! Never commit it to version control.");
    println!("Reference it from gatehouse.yaml with `secret_env: GATEHOUSE_SECRET`.");
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<()> {
    println!("{}", phc_hash(password)?);
    Ok(())
}

fn phc_hash(password: &str) -> anyhow::Result<String> {
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    Ok(hash)
}
