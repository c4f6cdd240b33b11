//! Server configuration.
//!
//! Values come from an optional YAML file named by `PINGBACK_CONFIG`, with
//! defaults for anything the file leaves out. `LISTEN` overrides the bind
//! address on top of that.
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:8080"
//!   max_request_bytes: 4096
//!   read_timeout_ms: 5000
//! logging:
//!   level: debug
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use tokio::sync::Semaphore;

pub const CONFIG_ENV: &str = "PINGBACK_CONFIG";
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on the bytes buffered for one request
    pub max_request_bytes: usize,
    pub read_chunk_size: usize,
    pub read_timeout_ms: u64,
    pub write_timeout_ms: u64,
    /// Connections served at the same time; further accepts wait
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            max_request_bytes: 4096,
            read_chunk_size: 1024,
            read_timeout_ms: 5_000,
            write_timeout_ms: 5_000,
            max_connections: 1024,
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            cfg.server.listen_addr = addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let server = &self.server;

        anyhow::ensure!(server.max_request_bytes > 0, "max_request_bytes must be positive");
        anyhow::ensure!(server.read_chunk_size > 0, "read_chunk_size must be positive");
        anyhow::ensure!(server.max_connections > 0, "max_connections must be positive");
        anyhow::ensure!(
            server.max_connections <= Semaphore::MAX_PERMITS,
            "max_connections must not exceed {}",
            Semaphore::MAX_PERMITS
        );
        Ok(())
    }
}
