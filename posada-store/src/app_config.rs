use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    pub rules: HouseRules,
}

/// Operational tunables carried into the request state. Loaded from the
/// config layers so a deployment can adjust them without a rebuild.
#[derive(Debug, Deserialize, Clone)]
pub struct HouseRules {
    pub draft_ttl_seconds: u64,
    #[serde(default = "default_auto_decline")]
    pub auto_decline_overlaps: bool,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    pub rate_limit_requests: u32,
    pub rate_limit_window_seconds: u64,
}

fn default_auto_decline() -> bool {
    true
}

fn default_currency() -> String {
    "EUR".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Run against in-memory stores instead of Postgres/Redis.
    #[serde(default)]
    pub demo: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of POSADA)
            // Eg.. `POSADA_SERVER__PORT=8080` would set the server port
            .add_source(config::Environment::with_prefix("POSADA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
