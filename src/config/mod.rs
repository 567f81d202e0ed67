//! Configuration management module.
//!
//! Supports loading configuration from:
//! - TOML files (config/default.toml, config/{profile}.toml)
//! - Environment variables with `TRACKER_SHORTENER__<SECTION>__<KEY>` pattern
//! - The plain `PORT` variable, which overrides `server.port`

mod server;
mod storage;

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use server::{ServerConfig, ServiceMode};
pub use storage::{FileStorageConfig, StorageBackend, StorageConfig};

/// Environment variable prefix for structured overrides.
pub const ENV_PREFIX: &str = "TRACKER_SHORTENER";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Exercise tracker configuration.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// URL shortener configuration.
    #[serde(default)]
    pub shortener: ShortenerConfig,

    /// Static page configuration.
    #[serde(default, rename = "static")]
    pub static_files: StaticConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. `.env` (if present, exported into the process environment)
    /// 2. `config/default.toml`
    /// 3. `config/{APP_PROFILE}.toml` (if `APP_PROFILE` is set)
    /// 4. Environment variables with `TRACKER_SHORTENER__` prefix
    /// 5. `PORT`
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "development".to_string());

        let port_override = std::env::var("PORT")
            .ok()
            .map(|port| {
                port.trim()
                    .parse::<u16>()
                    .map_err(|e| ConfigError::Message(format!("PORT is not a valid port: {e}")))
            })
            .transpose()?;

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            // TRACKER_SHORTENER__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port_override.map(i64::from))?
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("server.port cannot be 0".to_string()));
        }

        self.storage.validate()?;

        if self.tracker.max_log_entries == 0 {
            return Err(ConfigError::Message(
                "tracker.max_log_entries cannot be 0".to_string(),
            ));
        }

        if self.shortener.sequence_name.trim().is_empty() {
            return Err(ConfigError::Message(
                "shortener.sequence_name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Exercise tracker configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Upper bound on log entries returned by one log query.
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
}

const fn default_max_log_entries() -> usize {
    1000
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_log_entries: default_max_log_entries(),
        }
    }
}

/// URL shortener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ShortenerConfig {
    /// Name of the sequence that hands out short codes.
    #[serde(default = "default_sequence_name")]
    pub sequence_name: String,
}

fn default_sequence_name() -> String {
    "shorturl".to_string()
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self {
            sequence_name: default_sequence_name(),
        }
    }
}

/// Static page configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    /// Directory holding `index.html`, served at `/`.
    #[serde(default = "default_views_dir")]
    pub views_dir: PathBuf,

    /// Directory served under `/public`.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

fn default_views_dir() -> PathBuf {
    PathBuf::from("./views")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./public")
}

impl Default for StaticConfig {
    fn default() -> Self {
        Self {
            views_dir: default_views_dir(),
            public_dir: default_public_dir(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "text" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Install the Prometheus recorder and expose it on `/metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_metrics_enabled() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}
