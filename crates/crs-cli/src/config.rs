//! Configuration: environment variables with an optional TOML-file override,
//! covering the bind address, CRS resource caps, default session budgets
//! and the single LLM/embedding endpoint key.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub history_cap: usize,
    pub max_steps: u32,
    pub max_tokens: u64,
    pub max_wall_clock_secs: u64,
    /// Endpoint for the embedding/LLM backend; unset means the server runs
    /// with `NullExternalServices`.
    pub llm_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4950)),
            history_cap: 10_000,
            max_steps: 64,
            max_tokens: 200_000,
            max_wall_clock_secs: 120,
            llm_endpoint: None,
        }
    }
}

impl Config {
    /// Load defaults, then a TOML file if one exists at `path`, then
    /// environment variable overrides — each layer wins over the last.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            if path.exists() {
                let text = std::fs::read_to_string(path)?;
                config = toml::from_str(&text)?;
            }
        }

        if let Ok(addr) = std::env::var("CRS_BIND_ADDR") {
            config.bind_addr = addr.parse()?;
        }
        if let Ok(v) = std::env::var("CRS_MAX_STEPS") {
            config.max_steps = v.parse()?;
        }
        if let Ok(v) = std::env::var("CRS_MAX_TOKENS") {
            config.max_tokens = v.parse()?;
        }
        if let Ok(v) = std::env::var("CRS_LLM_ENDPOINT") {
            config.llm_endpoint = Some(v);
        }

        Ok(config)
    }

    #[must_use]
    pub fn budget(&self) -> crs_session::Budget {
        crs_session::Budget {
            max_steps: self.max_steps,
            max_tokens: self.max_tokens,
            max_wall_clock: Duration::from_secs(self.max_wall_clock_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_to_loopback() {
        let config = Config::default();
        assert_eq!(config.bind_addr.port(), 4950);
    }

    #[test]
    fn toml_override_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crs.toml");
        std::fs::write(&path, "max_steps = 10\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.max_steps, 10);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/crs.toml"))).unwrap();
        assert_eq!(config.max_steps, Config::default().max_steps);
    }
}
