//! TOML configuration model and config file discovery
//!
//! The TOML file is the third tier of configuration. Resolution order is:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Tiers 1 and 2 are handled by the binaries (clap `env`); this module only
//! finds and parses tier 3.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SCOUT_CONFIG";

/// Logging section of the TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "scout_fetch=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Contents of `config.toml`
///
/// Every field is optional: absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Scheme + host (+ port) of the listing/detail service
    pub base_url: Option<String>,
    /// Route of the paginated listing endpoint
    pub list_route: Option<String>,
    /// Route prefix of the detail endpoint; the identifier is appended
    pub detail_route: Option<String>,
    /// Number of records to retain (K)
    pub result_count: Option<usize>,
    /// Maximum concurrent detail fetches per batch
    pub max_concurrency: Option<usize>,
    /// Per-request HTTP timeout
    pub request_timeout_secs: Option<u64>,
    /// Overall pipeline deadline
    pub deadline_secs: Option<u64>,
    /// Output format ("text" or "json")
    pub output: Option<String>,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Platform config file location: `<config_dir>/scout/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scout").join("config.toml"))
}

/// Find the config file to load, if any
///
/// **Priority:**
/// 1. Explicit path (from `--config`); returned even if missing so the caller reports it
/// 2. `SCOUT_CONFIG` environment variable
/// 3. Platform default, only if it exists
pub fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// TOML tier plus the file it came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    /// `None` when no file was found and defaults apply
    pub source: Option<PathBuf>,
}

/// Locate and load the TOML tier
///
/// No file found is not an error: defaults apply. A file that exists but
/// cannot be read or parsed is an error. Runs before logging is set up, so
/// the caller reports `source` once the subscriber is installed.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    match locate_config_file(explicit) {
        Some(path) => Ok(LoadedConfig {
            config: load_toml_config(&path)?,
            source: Some(path),
        }),
        None => Ok(LoadedConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml() {
        let config: TomlConfig = toml::from_str(
            r#"
            base_url = "http://example.test"
            result_count = 3

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url.as_deref(), Some("http://example.test"));
        assert_eq!(config.result_count, Some(3));
        assert_eq!(config.max_concurrency, None);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: std::result::Result<TomlConfig, _> = toml::from_str("result_count = \"five\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("scout/config.toml"));
        }
    }
}
