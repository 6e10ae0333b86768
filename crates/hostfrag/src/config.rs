//! Configuration loading and types

use std::path::{Path, PathBuf};

use hostfrag_inventory::DataLayout;
use serde::{Deserialize, Serialize};

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "HOSTFRAG_CONFIG";

/// Top-level configuration for hostfrag
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fragment directory layout
    #[serde(default)]
    pub layout: DataLayout,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("cannot read config {}: {e}", path.display()))?;
        Self::parse(&content)
            .map_err(|e| eyre::eyre!("invalid config {}: {e}", path.display()))
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML for [`Config`]
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from an explicit path, the environment, default paths, or use defaults
    ///
    /// # Errors
    /// Returns error if a named or discovered file cannot be loaded
    pub fn resolve(explicit: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        for path in default_paths() {
            if path.is_file() {
                return Self::load(&path);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Config::default())
    }
}

fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("hostfrag.toml"),
        PathBuf::from("/etc/hostfrag/hostfrag.toml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("hostfrag/hostfrag.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.layout, DataLayout::default());
    }

    #[test]
    fn test_parse_layout() {
        let config = Config::parse(
            r#"
            [layout]
            data_dir = "/srv/inventory"
            environment = "staging"

            [log]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.groups_dir(), PathBuf::from("/srv/inventory/staging/groups"));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_unknown_type_is_error() {
        assert!(Config::parse("[layout]\nenvironment = 3\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::resolve(Some(Path::new("/nonexistent/hostfrag.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/hostfrag.toml"));
    }
}
