//! TOML configuration.
//!
//! Every section is optional; a missing file can be replaced by
//! [`Config::minimal`].
//!
//! ```toml
//! [checks]
//! strict = true
//! score_min = 0.0
//! score_max = 1.0
//! require_rfc3339 = true
//!
//! [server]
//! bind = "127.0.0.1:7340"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use ragwire_core::check::CheckPolicy;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChecksConfig {
    /// Treat check violations as failures instead of warnings.
    #[serde(default)]
    pub strict: bool,
    /// `score_min`, `score_max`, and `require_rfc3339` live directly in `[checks]`.
    #[serde(flatten)]
    pub policy: CheckPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7340".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Defaults for every section, used when no config file is present.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    // Validate checks
    for (name, bound) in [
        ("checks.score_min", config.checks.policy.score_min),
        ("checks.score_max", config.checks.policy.score_max),
    ] {
        if let Some(v) = bound {
            if !v.is_finite() {
                anyhow::bail!("{} must be a finite number", name);
            }
        }
    }
    let policy = &config.checks.policy;
    if let (Some(min), Some(max)) = (policy.score_min, policy.score_max) {
        if min > max {
            anyhow::bail!(
                "checks.score_min ({}) must not exceed checks.score_max ({})",
                min,
                max
            );
        }
    }

    // Validate server
    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.logging.level.trim().is_empty() {
        anyhow::bail!("logging.level must not be empty");
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}
