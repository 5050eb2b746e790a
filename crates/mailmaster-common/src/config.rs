//! Configuration for MailMaster

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "MAILMASTER_CONFIG";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Outgoing mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Demo user seeding
    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname
    #[serde(default = "default_hostname")]
    pub hostname: String,

    /// Bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: default_hostname(),
            bind_address: default_bind_address(),
        }
    }
}

fn default_hostname() -> String {
    "localhost".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database backend: "postgres" or "memory"
    #[serde(default = "default_db_backend")]
    pub backend: String,

    /// Database URL (for postgres)
    pub url: Option<String>,

    /// Maximum connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Run embedded migrations at startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    /// In-memory store, used for local development and tests
    pub fn in_memory() -> Self {
        Self {
            backend: "memory".to_string(),
            url: None,
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            run_migrations: false,
        }
    }
}

fn default_db_backend() -> String {
    "postgres".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_run_migrations() -> bool {
    true
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API port
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Public base URL used to build pagination links (e.g. "https://mail.example.com")
    #[serde(default)]
    pub public_url: Option<String>,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
            public_url: None,
            cors_origins: Vec::new(),
        }
    }
}

fn default_api_port() -> u16 {
    8080
}

/// Outgoing mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Transport: "smtp" or "log"
    #[serde(default = "default_mail_transport")]
    pub transport: String,

    /// SMTP relay host
    #[serde(default = "default_hostname")]
    pub host: String,

    /// SMTP relay port
    #[serde(default = "default_mail_port")]
    pub port: u16,

    /// SMTP username
    pub username: Option<String>,

    /// SMTP password
    pub password: Option<String>,

    /// Use implicit TLS
    #[serde(default)]
    pub use_tls: bool,

    /// Use STARTTLS
    #[serde(default)]
    pub use_starttls: bool,

    /// Sender address
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Sender display name
    #[serde(default = "default_from_name")]
    pub from_name: Option<String>,

    /// SMTP timeout in seconds
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            transport: default_mail_transport(),
            host: default_hostname(),
            port: default_mail_port(),
            username: None,
            password: None,
            use_tls: false,
            use_starttls: false,
            from_address: default_from_address(),
            from_name: default_from_name(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

fn default_mail_transport() -> String {
    "log".to_string()
}

fn default_mail_port() -> u16 {
    25
}

fn default_from_address() -> String {
    "newsletter@example.com".to_string()
}

fn default_from_name() -> Option<String> {
    Some("MailMaster".to_string())
}

fn default_mail_timeout() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Demo user seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Create the admin and editor demo users at startup when missing
    #[serde(default)]
    pub enabled: bool,

    /// Password given to seeded users
    #[serde(default = "default_seed_password")]
    pub password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            password: default_seed_password(),
        }
    }
}

fn default_seed_password() -> String {
    "password".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from the first config file found, overlaid with
    /// `MAILMASTER__SECTION__KEY` environment variables
    pub fn load() -> crate::Result<Self> {
        let mut paths = vec![
            PathBuf::from("./config.toml"),
            PathBuf::from("/etc/mailmaster/config.toml"),
        ];
        if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
            paths.insert(0, PathBuf::from(explicit));
        }

        let mut builder = config::Config::builder();
        if let Some(path) = paths.into_iter().find(|p| p.exists()) {
            builder = builder.add_source(config::File::from(path));
        }

        builder
            .add_source(
                config::Environment::with_prefix("MAILMASTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| crate::Error::Config(format!("Failed to load configuration: {}", e)))
    }
}
