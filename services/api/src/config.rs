//! Service configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `config/todo-api.{toml,yaml,json}` file, then `TODO_API__*` environment
//! variables (`TODO_API__SERVER__PORT=9000`, `TODO_API__STORAGE__BACKEND=memory`).
//! The PostgreSQL connection itself comes from `DATABASE_URL`, see
//! [`common::database::DatabaseConfig`].

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "config/todo-api";
const ENV_PREFIX: &str = "TODO_API";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Process-local tables, lost on shutdown
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Fallback filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Settings {
    /// Load settings from defaults, the default config file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Some(DEFAULT_CONFIG_FILE))
    }

    /// Load settings, optionally reading `file` (extension resolved by `config`)
    pub fn load_from(file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("storage.backend", "postgres")?
            .set_default("log.level", "info")?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
