//! Grid configuration
//!
//! Stored in `~/.config/ordergrid/config.yaml`. Command line flags override
//! whatever is loaded here.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Failure reading or writing a config file
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to access {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "invalid config {}: {}", path.display(), message)
            }
            ConfigError::NoConfigDir => write!(f, "no config directory available"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Settings that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Column schema YAML; the built-in garment order schema when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
    /// JSON row store; `rows.json` in the config dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,
    /// Use the platform clipboard (otherwise copy/paste stays in-process)
    #[serde(default = "default_system_clipboard")]
    pub system_clipboard: bool,
}

fn default_system_clipboard() -> bool {
    true
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            schema: None,
            store: None,
            system_clipboard: default_system_clipboard(),
        }
    }
}

impl GridConfig {
    /// Load config from the user config dir, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save config to the user config dir
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Row store location, falling back to the config dir
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store
            .clone()
            .or_else(crate::config_paths::default_store_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert!(config.system_clipboard);
        assert!(config.schema.is_none());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: GridConfig = serde_yaml::from_str("store: /tmp/rows.json\n").unwrap();
        assert_eq!(config.store, Some(PathBuf::from("/tmp/rows.json")));
        assert!(config.system_clipboard);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = GridConfig {
            schema: Some(PathBuf::from("schema.yaml")),
            store: None,
            system_clipboard: false,
        };
        config.save_to(&path).unwrap();
        assert_eq!(GridConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "system_clipboard: [not, a, bool]").unwrap();
        assert!(matches!(
            GridConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
