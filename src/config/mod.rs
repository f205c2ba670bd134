use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// File the session is persisted to. Unset keeps the session in memory.
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: String,
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub log: LogConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::load(&run_mode, app_environment())
    }

    /// Builds settings from defaults, the optional `config/default` and
    /// `config/<run_mode>` files, then `environment` on top.
    pub fn load(run_mode: &str, environment: Environment) -> Result<Self, ConfigError> {
        defaults(Config::builder())?
            .set_default("environment", run_mode)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // E.g., `APP_API__BASE_URL=https://api.example.com` sets `Settings.api.base_url`
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    #[cfg(test)]
    pub fn new_for_test() -> Result<Self, ConfigError> {
        defaults(Config::builder())?
            .set_default("environment", "test")?
            .set_default("api.base_url", "http://127.0.0.1:8000")?
            .set_default("api.timeout_secs", 1)?
            .build()?
            .try_deserialize()
    }
}

fn defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("environment", "development")?
        .set_default("api.base_url", "http://localhost:8000")?
        .set_default("api.timeout_secs", 10)?
        .set_default("log.level", "info")
}

/// Environment variables with prefix `APP_` and `__` between nested keys.
pub fn app_environment() -> Environment {
    Environment::with_prefix("app")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
