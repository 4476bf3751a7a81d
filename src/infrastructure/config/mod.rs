//! Configuration loading.
//!
//! Hierarchical merging via figment: built-in defaults, then the project
//! YAML file, then `CORRAL_*` environment variables. The profile (per-task
//! model defaults) loads the same way from its own file and is handed to the
//! pipelines as an owned snapshot; merging a patch produces a new snapshot
//! (see `Profile::merged`), never a mutation of shared state.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::Profile;
use crate::infrastructure::openai::BackendConfig;

/// Default locations, relative to the working directory.
pub const CONFIG_FILE: &str = ".corral/config.yaml";
pub const PROFILES_FILE: &str = ".corral/profiles.yaml";

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Filter for subscriber setup: an explicit `RUST_LOG` wins, otherwise
    /// the configured level becomes the default directive.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.level))
    }

    /// Whether log output should be JSON rather than the pretty layer.
    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

/// Process configuration for the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GatewayConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load gateway configuration.
    ///
    /// Precedence (lowest to highest): built-in defaults, `.corral/config.yaml`,
    /// `CORRAL_*` environment variables (`__` separates nesting, e.g.
    /// `CORRAL_BACKEND__BASE_URL`).
    pub fn load() -> GatewayResult<GatewayConfig> {
        let config: GatewayConfig = Figment::new()
            .merge(Serialized::defaults(GatewayConfig::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Env::prefixed("CORRAL_").split("__"))
            .extract()
            .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load gateway configuration from a specific file, for tests and
    /// one-off runs.
    pub fn load_from_file(path: impl AsRef<Path>) -> GatewayResult<GatewayConfig> {
        let config: GatewayConfig = Figment::new()
            .merge(Serialized::defaults(GatewayConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load the profile: defaults merged with `.corral/profiles.yaml`.
    pub fn load_profile() -> GatewayResult<Profile> {
        Self::load_profile_from(PROFILES_FILE)
    }

    /// Load the profile from a specific file. A missing file yields the
    /// built-in defaults.
    pub fn load_profile_from(path: impl AsRef<Path>) -> GatewayResult<Profile> {
        Figment::new()
            .merge(Serialized::defaults(Profile::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .map_err(|e| GatewayError::InvalidConfig(e.to_string()))
    }

    /// Persist a profile snapshot atomically (write-temp-then-rename).
    pub fn save_profile(path: impl AsRef<Path>, profile: &Profile) -> GatewayResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GatewayError::InvalidConfig(format!("create {parent:?}: {e}")))?;
        }
        let yaml = serde_yaml::to_string(profile)
            .map_err(|e| GatewayError::InvalidConfig(format!("serialize profile: {e}")))?;
        let tmp = path.with_extension("yaml.tmp");
        std::fs::write(&tmp, yaml)
            .map_err(|e| GatewayError::InvalidConfig(format!("write {tmp:?}: {e}")))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| GatewayError::InvalidConfig(format!("rename {tmp:?}: {e}")))?;
        Ok(())
    }

    /// Validate configuration after loading.
    pub fn validate(config: &GatewayConfig) -> GatewayResult<()> {
        if config.backend.base_url.trim().is_empty() {
            return Err(GatewayError::InvalidConfig(
                "backend.base_url cannot be empty".to_string(),
            ));
        }
        if config.backend.timeout_secs == 0 {
            return Err(GatewayError::InvalidConfig(
                "backend.timeout_secs must be positive".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logging.level.as_str()) {
            return Err(GatewayError::InvalidConfig(format!(
                "logging.level '{}' must be one of: trace, debug, info, warn, error",
                config.logging.level
            )));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&config.logging.format.as_str()) {
            return Err(GatewayError::InvalidConfig(format!(
                "logging.format '{}' must be one of: json, pretty",
                config.logging.format
            )));
        }

        Ok(())
    }
}
