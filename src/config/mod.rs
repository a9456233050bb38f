//! Configuration management
//!
//! Sources, lowest precedence first: built-in defaults, an optional
//! `switchdesk.toml` (path in `SWITCHDESK_CONFIG`), `SWITCHDESK__*`
//! environment variables, and finally a bare `PORT`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "switchdesk";
const ENV_PREFIX: &str = "SWITCHDESK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub switchboard: SwitchboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    /// Unset: a call rings until someone acts
    #[serde(default)]
    pub ringing_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            switchboard: SwitchboardConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load from file and environment
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var("SWITCHDESK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = Self::defaults()?
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Failed to load configuration from {}", path))
    }

    /// Parse a TOML document layered over the defaults
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config = Self::defaults()?
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("logging.level", defaults.logging.level)?;
        Ok(builder)
    }

    pub fn ringing_timeout(&self) -> Option<Duration> {
        self.switchboard
            .ringing_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
