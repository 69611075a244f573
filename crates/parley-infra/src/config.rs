//! Configuration loading.
//!
//! Two tiers: required credentials come from the environment and are fatal
//! when missing; tunables come from `{data_dir}/config.toml` and fall back to
//! defaults when the file is missing or malformed.

use std::path::Path;

use secrecy::SecretString;

use parley_types::config::EngineConfig;
use parley_types::error::ConfigError;

/// Environment variable naming the document store base URL.
pub const ENV_STORE_URL: &str = "PARLEY_STORE_URL";
/// Environment variable naming the document store API key.
pub const ENV_STORE_API_KEY: &str = "PARLEY_STORE_API_KEY";
/// Environment variable naming the generation service API key.
pub const ENV_GEMINI_API_KEY: &str = "PARLEY_GEMINI_API_KEY";

/// Required startup credentials.
///
/// API keys are wrapped in [`SecretString`] and never appear in logs or
/// Debug output.
#[derive(Debug)]
pub struct Settings {
    pub store_url: String,
    pub store_api_key: SecretString,
    pub gemini_api_key: SecretString,
}

impl Settings {
    /// Read settings through a lookup function (testable seam).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnv(name.to_string()))
        };

        Ok(Self {
            store_url: require(ENV_STORE_URL)?,
            store_api_key: SecretString::from(require(ENV_STORE_API_KEY)?),
            gemini_api_key: SecretString::from(require(ENV_GEMINI_API_KEY)?),
        })
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Load engine tunables from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`EngineConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
pub async fn load_engine_config(data_dir: &Path) -> EngineConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return EngineConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return EngineConfig::default();
        }
    };

    match toml::from_str::<EngineConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            EngineConfig::default()
        }
    }
}
