//! Service settings.
//!
//! Read from an optional `settings.toml` in the working directory, then from
//! `SPLITLEDGER_*` environment variables (`SPLITLEDGER_MONGODB_URI`,
//! `SPLITLEDGER_PORT`, ...). Only the MongoDB URI has no default.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub mongodb_uri: String,
    pub database: String,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_sources(Environment::with_prefix("SPLITLEDGER").try_parsing(true))
    }

    fn from_sources(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database", "OpenSplit")?
            .set_default("bind", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .add_source(File::with_name("settings").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
