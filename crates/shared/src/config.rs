//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Evidence file storage configuration.
    #[serde(default)]
    pub storage: EvidenceStorageSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
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

/// Object storage backend for evidence uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Local filesystem (development only).
    #[default]
    Local,
    /// S3-compatible storage (Supabase, R2, AWS).
    S3,
    /// Azure Blob Storage.
    AzureBlob,
}

/// Evidence storage settings.
///
/// Credentials are only read for the backends that need them.
#[derive(Debug, Clone, Deserialize)]
pub struct EvidenceStorageSettings {
    /// Which backend to use.
    #[serde(default)]
    pub provider: StorageBackend,
    /// Root directory for the local backend.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Bucket (or container) holding evidence files.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// S3 endpoint URL.
    pub endpoint: Option<String>,
    /// S3 access key ID, or Azure account name.
    pub access_key_id: Option<String>,
    /// S3 secret access key, or Azure account key.
    pub secret_access_key: Option<String>,
    /// S3 region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Base URL under which uploaded objects are publicly readable.
    pub public_base_url: Option<String>,
    /// Maximum evidence file size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_storage_root() -> String {
    "./storage".to_string()
}

fn default_bucket() -> String {
    "evidence".to_string()
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for EvidenceStorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageBackend::default(),
            root: default_storage_root(),
            bucket: default_bucket(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            region: default_region(),
            public_base_url: None,
            max_file_size: default_max_file_size(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "gestor=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
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
            .add_source(config::Environment::with_prefix("GESTOR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
