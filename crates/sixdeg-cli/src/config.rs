//! CLI configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use sixdeg_core::SearchConfig;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SIXDEG_CONFIG";

/// Get config file path
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sixdeg")
        .join("config.toml")
}

/// Settings stored in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// Dataset used when `--data` is not given
    Dataset,
    /// Default output format (table or json)
    Format,
    /// Longest connection searched for, in hops
    #[value(name = "max_depth")]
    MaxDepth,
    /// Timeout for each relationship lookup, in milliseconds
    #[value(name = "lookup_timeout_ms")]
    LookupTimeoutMs,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Format => "format",
            Self::MaxDepth => "max_depth",
            Self::LookupTimeoutMs => "lookup_timeout_ms",
        }
    }
}

/// Configuration for the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_timeout_ms: Option<u64>,
}

impl Config {
    /// Load from the config file, or defaults when it does not exist
    pub fn load() -> anyhow::Result<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write to the config file, refusing search settings the engine would reject
    pub fn save(&self) -> anyhow::Result<()> {
        self.search_config().validate()?;

        let path = config_file_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        tracing::debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Value of `key`, `None` when unset
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::Dataset => self.dataset.as_ref().map(|p| p.display().to_string()),
            ConfigKey::Format => self.format.clone(),
            ConfigKey::MaxDepth => self.max_depth.map(|d| d.to_string()),
            ConfigKey::LookupTimeoutMs => self.lookup_timeout_ms.map(|t| t.to_string()),
        }
    }

    /// Set `key`; search settings are checked against the engine's limits
    pub fn set(&mut self, key: ConfigKey, value: &str) -> anyhow::Result<()> {
        match key {
            ConfigKey::Dataset => self.dataset = Some(PathBuf::from(value)),
            ConfigKey::Format => {
                let format = value.to_lowercase();
                if !matches!(format.as_str(), "table" | "json") {
                    anyhow::bail!("Unknown format '{}' (expected table or json)", value);
                }
                self.format = Some(format);
            }
            ConfigKey::MaxDepth => {
                let depth = value
                    .parse::<u32>()
                    .context("max_depth must be a whole number of hops")?;
                let search = self.search_config().with_max_depth(depth);
                search.validate()?;
                self.max_depth = search.max_depth;
            }
            ConfigKey::LookupTimeoutMs => {
                let timeout = value
                    .parse::<u64>()
                    .context("lookup_timeout_ms must be a whole number of milliseconds")?;
                let search = self.search_config().with_lookup_timeout_ms(timeout);
                search.validate()?;
                self.lookup_timeout_ms = search.lookup_timeout_ms;
            }
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Dataset => self.dataset = None,
            ConfigKey::Format => self.format = None,
            ConfigKey::MaxDepth => self.max_depth = None,
            ConfigKey::LookupTimeoutMs => self.lookup_timeout_ms = None,
        }
    }

    /// Search settings stored in the config
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_depth: self.max_depth,
            lookup_timeout_ms: self.lookup_timeout_ms,
        }
    }
}
