//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments (applied by the caller)

use crate::error::{Error, Result};
use argbind_core::Registry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Classes available to every schema, by name
    pub classes: BTreeMap<String, ClassConfig>,
}

/// A class declared in configuration or a case file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassConfig {
    /// Parent class name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

impl ClassConfig {
    pub fn extending(parent: impl Into<String>) -> Self {
        Self {
            extends: Some(parent.into()),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format
    pub format: String,

    /// Use colored output by default
    pub color: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
            file: None,
        }
    }
}

/// Configuration file formats, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Yaml,
    Toml,
    Json,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".argbind.yaml"),
            PathBuf::from(".argbind.json"),
            PathBuf::from(".argbind.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let argbind_dir = config_dir.join("argbind");
            paths.push(argbind_dir.join("config.yaml"));
            paths.push(argbind_dir.join("config.json"));
            paths.push(argbind_dir.join("config.toml"));
        }

        paths
    }

    /// Build a registry holding the built-ins plus the configured classes
    pub fn registry(&self) -> Result<Registry> {
        let mut registry = Registry::new();
        declare_classes(&mut registry, &self.classes)?;
        Ok(registry)
    }

    /// Serialize in the format implied by `path` and write it
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Add class declarations to `registry`; parents may be declared in any order
pub fn declare_classes(
    registry: &mut Registry,
    classes: &BTreeMap<String, ClassConfig>,
) -> Result<()> {
    registry.declare_classes(
        classes
            .iter()
            .map(|(name, class)| (name.as_str(), class.extends.as_deref())),
    )?;
    Ok(())
}
