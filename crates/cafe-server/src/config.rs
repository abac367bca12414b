//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `cafe-server.toml`, then `CAFE_*` environment variables.

use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, Source};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Config file read when `CAFE_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "cafe-server.toml";

const ENV_PREFIX: &str = "CAFE";

#[derive(Clone, Deserialize)]
pub struct Config {
    pub bind_address: String,
    pub database_path: String,
    pub static_dir: PathBuf,
    /// Shared secret for `DELETE /report-closed/{id}`. Unset disables deletes.
    #[serde(default)]
    pub api_key: Option<String>,
    pub max_connections: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_path", &self.database_path)
            .field("static_dir", &self.static_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Load from defaults, the config file and the environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("CAFE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        tracing::info!("Loading configuration (file: {}, env prefix: {}_)", path, ENV_PREFIX);

        Self::layered(
            File::with_name(&path).required(false),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// Load from defaults overlaid with a TOML document, ignoring the process environment
    #[cfg(test)]
    pub fn from_toml(toml: &str) -> Result<Self> {
        Self::from_toml_and_env(toml, config::Map::new())
    }

    /// Like [`Config::from_toml`], with `vars` standing in for the process environment
    #[cfg(test)]
    pub fn from_toml_and_env(
        toml: &str,
        vars: config::Map<String, String>,
    ) -> Result<Self> {
        Self::layered(
            File::from_str(toml, config::FileFormat::Toml),
            Environment::with_prefix(ENV_PREFIX).source(Some(vars)),
        )
    }

    fn layered<F>(file: F, env: Environment) -> Result<Self>
    where
        F: Source + Send + Sync + 'static,
    {
        let builder = Self::defaults()?.add_source(file).add_source(env);
        Self::build(builder)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = config::Config::builder()
            .set_default("bind_address", "127.0.0.1:5000")?
            .set_default("database_path", "cafes.db")?
            .set_default("static_dir", "static")?
            .set_default("max_connections", 5_i64)?;
        Ok(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let mut config: Config = builder
            .build()
            .context("Failed to read configuration sources")?
            .try_deserialize()
            .context("Failed to parse configuration")?;

        // An empty key would match an empty `api-key` parameter
        if config.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
            config.api_key = None;
        }

        config.socket_addr()?;
        if config.max_connections == 0 {
            anyhow::bail!("max_connections must be at least 1");
        }

        Ok(config)
    }
}
