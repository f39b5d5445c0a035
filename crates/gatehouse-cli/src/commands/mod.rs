//! CLI command implementations for Gatehouse.

pub mod secret;
pub mod serve;
pub mod token;

use anyhow::Context;
use gatehouse_auth::{Gatehouse, GatehouseSettings};
use gatehouse_core::GatehouseConfig;
use std::path::Path;

/// Load the configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<GatehouseConfig> {
    GatehouseConfig::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

/// Build a gatehouse from a loaded configuration.
pub fn build_gatehouse(config: &GatehouseConfig) -> anyhow::Result<Gatehouse> {
    let settings = GatehouseSettings::from_config(config).context("Invalid configuration")?;
    Gatehouse::new(settings).context("Failed to initialize gatehouse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_gatehouse_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "domain: test.local\nsecret: 1c2b79719568a9ba9d3392156bcabcca\ntoken_lifetime: 15m"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        let gatehouse = build_gatehouse(&config).unwrap();

        assert_eq!(gatehouse.sessions().lifetime(), chrono::Duration::minutes(15));
        let session = gatehouse.issue_session("testy").unwrap();
        assert_eq!(gatehouse.validate_session(&session.access_token).unwrap().id, "testy");
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_config(Path::new("/nonexistent/gatehouse.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/gatehouse.yaml"));
    }
}
