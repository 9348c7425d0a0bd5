//! Configuration types and parsing for stratum.yml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main project configuration from stratum.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Frontend serve configuration
    #[serde(default)]
    pub serve: ServeConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Frontend serve configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// Port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            database: DatabaseConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

fn default_name() -> String {
    "stratum".to_string()
}

fn default_db_path() -> String {
    "stratum.duckdb".to_string()
}

fn default_host() -> String {
    // All interfaces: the launcher contract, not a dev-only loopback
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory, falling back to
    /// defaults when no stratum.yml / stratum.yaml exists.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let yml_path = dir.join("stratum.yml");
        let yaml_path = dir.join("stratum.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.name.is_empty(), "project name cannot be empty");
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database path cannot be empty"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
