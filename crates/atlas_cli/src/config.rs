use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // PostgreSQL configuration
    /// PostgreSQL host
    #[serde(default = "default_postgres_host")]
    pub postgres_host: String,

    /// PostgreSQL port
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,

    /// PostgreSQL database name
    #[serde(default = "default_postgres_database")]
    pub postgres_database: String,

    /// PostgreSQL username
    #[serde(default = "default_postgres_username")]
    pub postgres_username: String,

    /// PostgreSQL password
    #[serde(default = "default_postgres_password")]
    pub postgres_password: String,

    /// Maximum pooled connections
    #[serde(default = "default_postgres_max_pool_size")]
    pub postgres_max_pool_size: usize,

    // Authorization configuration
    /// Deadline for a single permission store lookup in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,

    /// Rule cache lifetime in seconds; 0 disables the cache
    #[serde(default)]
    pub permission_cache_ttl_secs: u64,

    /// Whether admin tiers see records with unset location levels
    #[serde(default = "default_open_unset_location_levels")]
    pub open_unset_location_levels: bool,

    /// Candidate batch size above which eager filtering is flagged
    #[serde(default = "default_filter_batch_limit")]
    pub filter_batch_limit: usize,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("ATLAS"))
            .build()?
            .try_deserialize()
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_postgres_host() -> String {
    "localhost".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_database() -> String {
    "atlas".to_string()
}

fn default_postgres_username() -> String {
    "atlas".to_string()
}

fn default_postgres_password() -> String {
    "atlas".to_string()
}

fn default_postgres_max_pool_size() -> usize {
    10
}

fn default_store_timeout_ms() -> u64 {
    2000
}

fn default_open_unset_location_levels() -> bool {
    true
}

fn default_filter_batch_limit() -> usize {
    50_000
}
