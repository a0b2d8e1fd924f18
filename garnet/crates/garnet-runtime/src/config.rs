//! Configuration module for the Garnet runtime.
//!
//! Handles loading, saving, and validating the settings a [`Runtime`]
//! is built from.
//!
//! [`Runtime`]: crate::runtime::Runtime

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use garnet_util::symbol::DEFAULT_CAPACITY;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "garnet.toml";

/// Runtime configuration.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
///
/// # Examples
///
/// ```rust
/// use garnet_runtime::RuntimeConfig;
///
/// let config = RuntimeConfig::from_toml_str("symbol_capacity = 4096").unwrap();
/// assert_eq!(config.symbol_capacity, 4096);
/// assert!(config.preintern_known_symbols);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Initial capacity of the symbol table.
    #[serde(default = "default_symbol_capacity")]
    pub symbol_capacity: usize,

    /// Intern the names the dispatch layer looks up on every call
    /// (`to_ary`, `to_str`, `call`, ...) when the runtime is built.
    #[serde(default = "default_true")]
    pub preintern_known_symbols: bool,

    /// Count symbol table hits and misses.
    #[serde(default = "default_true")]
    pub track_interner_stats: bool,
}

fn default_symbol_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbol_capacity: default_symbol_capacity(),
            preintern_known_symbols: true,
            track_interner_stats: true,
        }
    }
}

impl RuntimeConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("loaded runtime configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("failed to serialize configuration: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol_capacity == 0 {
            return Err(ConfigError::Invalid(
                "symbol_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.symbol_capacity, 1024);
        assert!(config.preintern_known_symbols);
        assert!(config.track_interner_stats);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = RuntimeConfig::from_toml_str("track_interner_stats = false\n").unwrap();
        assert!(!config.track_interner_stats);
        assert_eq!(config.symbol_capacity, 1024);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = RuntimeConfig::from_toml_str("symbol_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("symbol_capacity"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RuntimeConfig::from_toml_str("gc_threads = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let original = RuntimeConfig {
            symbol_capacity: 64,
            preintern_known_symbols: false,
            track_interner_stats: false,
        };
        original.save_to_path(&config_path).unwrap();

        let loaded = RuntimeConfig::load_from_path(&config_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = RuntimeConfig::load_from_path(Path::new("/nonexistent/path/garnet.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
