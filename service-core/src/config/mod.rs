use crate::error::AppError;
use config::{Config as Cfg, ConfigError, Environment, File};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Span export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

/// Layered settings: optional `configuration.*` file, then `APP__`-prefixed
/// environment variables (`APP__GENERATOR__TIMEOUT_SECS` -> `generator.timeout_secs`).
fn settings() -> Result<Cfg, AppError> {
    dotenvy::dotenv().ok();

    let settings = Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings)
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        Ok(settings()?.try_deserialize()?)
    }
}

/// Load one nested section of the settings, falling back to `T::default()`
/// when nothing under `key` is set.
pub fn load_section<T>(key: &str) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    match settings()?.get::<T>(key) {
        Ok(section) => Ok(section),
        Err(ConfigError::NotFound(_)) => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}
