use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the raw 32-byte archive encryption key
pub const ENCRYPTION_KEY_VAR: &str = "ARCHIVER_AES_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub archiver: ArchiverConfig,
    pub encryption: EncryptionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiverConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptionConfig {
    pub compression_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("ARCHIVIST").separator("__"));

        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("archiver.timeout_ms", 3000)?
            .set_default("archiver.connect_timeout_ms", 3000)?
            .set_default(
                "encryption.compression_level",
                crate::core::codec::DEFAULT_COMPRESSION_LEVEL,
            )?
            .set_default("logging.level", "info")?
            .build()?
            .try_deserialize()
    }

    pub fn encryption_key() -> Result<Vec<u8>> {
        env::var(ENCRYPTION_KEY_VAR)
            .map(String::into_bytes)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", ENCRYPTION_KEY_VAR))
    }
}
