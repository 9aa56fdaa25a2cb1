use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BoxServiceConfig {
    pub common: core_config::Config,
    pub generator: GeneratorConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Explicit path to the generator binary, checked before any derived location.
    #[serde(default)]
    pub executable: Option<PathBuf>,
    #[serde(default = "default_executable_name")]
    pub executable_name: String,
    /// Installation prefix whose scripts directory holds the generator.
    /// Falls back to `$VIRTUAL_ENV`.
    #[serde(default)]
    pub install_prefix: Option<PathBuf>,
    #[serde(default = "default_subcommand")]
    pub subcommand: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Reject zero or negative dimensions with 422 instead of handing them to the tool.
    #[serde(default)]
    pub require_positive_dimensions: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// URL prefix the output directory is mounted under, also used to build `svg_path`.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

fn default_executable_name() -> String {
    if cfg!(windows) {
        "boxes.exe".to_string()
    } else {
        "boxes".to_string()
    }
}

fn default_subcommand() -> String {
    "UniversalBox".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_concurrent() -> usize {
    4
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_url_prefix() -> String {
    "output".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            executable: None,
            executable_name: default_executable_name(),
            install_prefix: None,
            subcommand: default_subcommand(),
            timeout_secs: default_timeout_secs(),
            max_concurrent: default_max_concurrent(),
            require_positive_dimensions: false,
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings under which no generation could ever succeed.
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        if self.max_concurrent == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "generator.max_concurrent must be at least 1"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "generator.timeout_secs must be at least 1"
            )));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            url_prefix: default_url_prefix(),
        }
    }
}

impl BoxServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let generator: GeneratorConfig = core_config::load_section("generator")?;
        let mut storage: StorageConfig = core_config::load_section("storage")?;

        // The generator is handed this path from its own working directory.
        storage.output_dir = std::path::absolute(&storage.output_dir)?;

        generator.ensure_valid()?;

        Ok(BoxServiceConfig {
            common,
            generator,
            storage,
        })
    }
}
