//! Configuration shared across all Gatehouse crates.

pub mod config;

pub use config::{BearerTokenConfig, ConfigError, GatehouseConfig, UserConfig};
