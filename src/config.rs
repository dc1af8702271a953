use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use hearth_shopping::{DEFAULT_LIST_TITLE, NameNormalizer, QuantityMode, Settings};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub shopping: ShoppingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShoppingConfig {
    #[serde(default = "default_list_title")]
    pub default_list_title: String,
    #[serde(default)]
    pub quantity_mode: QuantityMode,
    /// Replaces the built-in modifier words stripped from ingredient names.
    #[serde(default)]
    pub modifiers: Option<Vec<String>>,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            default_list_title: default_list_title(),
            quantity_mode: QuantityMode::default(),
            modifiers: None,
        }
    }
}

fn default_list_title() -> String {
    DEFAULT_LIST_TITLE.to_string()
}

impl ShoppingConfig {
    pub fn settings(&self) -> Settings {
        let normalizer = match &self.modifiers {
            Some(modifiers) => NameNormalizer::new(modifiers.iter().map(String::as_str)),
            None => NameNormalizer::default(),
        };

        Settings {
            default_list_title: self.default_list_title.trim().to_string(),
            quantity_mode: self.quantity_mode,
            normalizer,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (HEARTH__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:hearth.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // optional, a missing file keeps the defaults
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("HEARTH")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.shopping.default_list_title.trim().is_empty() {
            return Err("Shopping default_list_title must not be empty".to_string());
        }
        Ok(())
    }
}
