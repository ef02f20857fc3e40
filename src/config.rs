use crate::core::{CoffeeError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    pub database: DatabaseConfig,
    pub bootstrap: Option<BootstrapConfig>,
}

/// SQLite connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path, or ":memory:"
    pub path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    #[serde(default = "default_wal")]
    pub wal: bool,
}

/// Script executed once when the gateway is constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapConfig {
    pub script: PathBuf,
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_wal() -> bool {
    true
}

impl GatewayConfig {
    /// Configuration for a database at `path` with default settings and no
    /// bootstrap script.
    pub fn new(path: impl Into<String>) -> Self {
        GatewayConfig {
            database: DatabaseConfig {
                path: path.into(),
                busy_timeout_ms: default_busy_timeout_ms(),
                wal: default_wal(),
            },
            bootstrap: None,
        }
    }

    /// Sets the script run at construction.
    pub fn with_bootstrap(mut self, script: impl Into<PathBuf>) -> Self {
        self.bootstrap = Some(BootstrapConfig {
            script: script.into(),
        });
        self
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = boutique_coffee::config::load_config("coffee.toml").expect("Failed to load config");
/// println!("{:?}", config.database.path);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<GatewayConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig> {
    toml::from_str(content).map_err(|e| CoffeeError::Config(e.to_string()))
}

/// Default location of the config file: `<config dir>/boutique-coffee/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("boutique-coffee").join("config.toml"))
}
