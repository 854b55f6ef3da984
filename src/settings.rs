use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub port: u16,
    pub enable_swagger: bool,
    /// Seconds between reminder scanner ticks.
    pub reminder_interval_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(Environment::with_prefix("APP").separator("_"))
            .set_default("debug", false)?
            .set_default("port", 8080)?
            .set_default("enable_swagger", true)?
            .set_default("reminder_interval_secs", 60)?
            .build()?;

        config.try_deserialize()
    }
}
