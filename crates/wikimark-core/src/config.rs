//! Engine configuration loaded from TOML.
//!
//! ```toml
//! format = "html"
//! plugins = ["footnotes", "task_lists", "math"]
//! max_depth = 32
//! ```
//!
//! Every field is optional; missing fields take their defaults (HTML, all
//! plugins, depth 64). Unknown fields are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markdown::Format;
use crate::plugins::PluginKind;
use crate::state::DEFAULT_MAX_DEPTH;

/// Engine settings: output format, plugin set and nesting limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format.
    pub format: Format,
    /// Plugins to register, in order.
    pub plugins: Vec<PluginKind>,
    /// Nesting limit for blocks and inlines.
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::Html,
            plugins: PluginKind::ALL.to_vec(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Parse a config from TOML text.
    ///
    /// ```rust
    /// use wikimark_core::{Config, Format, PluginKind};
    ///
    /// let config = Config::from_toml_str("format = \"ast\"\nplugins = [\"mark\"]").unwrap();
    /// assert_eq!(config.format, Format::Ast);
    /// assert_eq!(config.plugins, vec![PluginKind::Mark]);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        let content = std::fs::read_to_string(config_path).map_err(|source| Error::ConfigRead {
            path: config_path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", config_path.display());
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.plugins.len(), 7);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml_str("format = \"ast\"\nplugins = [\"mark\", \"fold\"]\n").unwrap();
        assert_eq!(config.format, Format::Ast);
        assert_eq!(config.plugins, vec![PluginKind::Mark, PluginKind::Fold]);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Config::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_unknown_plugin_is_rejected() {
        assert!(Config::from_toml_str("plugins = [\"tables\"]").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load_from_path("/nonexistent/wikimark.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
        assert!(!err.is_document_error());
    }
}
