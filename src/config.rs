//! Runtime configuration.
//!
//! Env vars first, optional `config/news.toml` as fallback, built-in
//! defaults last. Env always wins so a deployment can override the file
//! without editing it.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/news.toml";

const ENV_BIND_ADDR: &str = "NEWS_BIND_ADDR";
const ENV_CACHE_TTL: &str = "NEWS_CACHE_TTL_SECS";
const ENV_FETCH_TIMEOUT: &str = "NEWS_FETCH_TIMEOUT_SECS";
const ENV_KEEP_UNDATED: &str = "NEWS_KEEP_UNDATED";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    /// Retention policy for items with no resolvable date (see
    /// `AggregateOptions::keep_undated`).
    pub keep_undated: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            cache_ttl: Duration::from_secs(3600),
            fetch_timeout: Duration::from_secs(12),
            keep_undated: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    cache_ttl_secs: Option<u64>,
    fetch_timeout_secs: Option<u64>,
    keep_undated: Option<bool>,
}

impl AppConfig {
    /// Defaults, overlaid with `config/news.toml` if present, overlaid
    /// with env vars.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();

        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let file: FileConfig = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            cfg.apply_file(file);
        }

        cfg.apply_env()?;
        Ok(cfg)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(addr) = file.bind_addr {
            self.bind_addr = addr;
        }
        if let Some(secs) = file.cache_ttl_secs {
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = file.fetch_timeout_secs {
            self.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(keep) = file.keep_undated {
            self.keep_undated = keep;
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(addr) = std::env::var(ENV_BIND_ADDR) {
            self.bind_addr = addr;
        }
        if let Ok(secs) = std::env::var(ENV_CACHE_TTL) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("{ENV_CACHE_TTL} must be a number of seconds"))?;
            self.cache_ttl = Duration::from_secs(secs);
        }
        if let Ok(secs) = std::env::var(ENV_FETCH_TIMEOUT) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("{ENV_FETCH_TIMEOUT} must be a number of seconds"))?;
            self.fetch_timeout = Duration::from_secs(secs);
        }
        if let Ok(v) = std::env::var(ENV_KEEP_UNDATED) {
            self.keep_undated = matches!(v.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overlay_keeps_unset_defaults() {
        let mut cfg = AppConfig::default();
        let file: FileConfig = toml::from_str("cache_ttl_secs = 120").unwrap();
        cfg.apply_file(file);
        assert_eq!(cfg.cache_ttl, Duration::from_secs(120));
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert!(cfg.keep_undated);
    }
}
