//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Raw object storage settings as they appear in config files and the
/// environment (`FOLIO__STORAGE__*`).
///
/// Nothing here is validated; `folio_core::storage::StorageConfig` decides
/// which transfer mechanism these settings enable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// Object store account id (R2 account).
    #[serde(default)]
    pub account_id: Option<String>,
    /// Object store access key id.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// Object store secret access key.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Bucket holding portfolio files.
    #[serde(default)]
    pub bucket_name: Option<String>,
    /// Native storage binding reachable without credentials.
    #[serde(default)]
    pub binding: Option<BindingSettings>,
    /// Maximum accepted file size in bytes.
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

/// Storage binding settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BindingSettings {
    /// Local filesystem rooted at `root`.
    Fs {
        /// Root directory.
        root: String,
    },
    /// Process-local memory (lost on restart).
    Memory,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
