use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// The archive's single principal. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password_hash: String,
    pub token_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded document payloads.
    pub docs_dir: PathBuf,
    /// Maximum accepted payload size in bytes.
    pub max_document_size: u64,
}

/// Raw allow/deny rule as written in the configuration file. Exactly one of
/// the two lists must be present; `AccessPolicy::from_config` enforces that.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AccessRuleConfig {
    pub allow: Option<Vec<String>>,
    pub deny: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    /// Network access rules keyed by resource kind name or `*`.
    #[serde(default)]
    pub access: HashMap<String, AccessRuleConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://archive.sqlite?mode=rwc")?
            .set_default("storage.docs_dir", "./docs")?
            .set_default("storage.max_document_size", 100 * 1024 * 1024i64)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., ARCHIVE__AUTH__TOKEN_SECRET)
            .add_source(Environment::with_prefix("ARCHIVE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
