//! Configuration file loading for the `economy` binary.
//!
//! Discovers `economy.toml` in the working directory (or takes an explicit
//! path) and merges it with CLI arguments. CLI arguments take precedence.

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "economy.toml";

/// Top-level configuration from economy.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Economy data file; the built-in reference economy when absent.
    pub data: Option<PathBuf>,

    pub logging: LoggingConfig,

    pub driver: DriverSection,
}

/// Logging section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `debug` or `info`.
    pub level: String,

    /// `pretty`, `compact` or `json`.
    pub format: String,

    /// Append log output to this file instead of stderr.
    pub file: Option<PathBuf>,

    /// Operation tags to keep. Empty keeps everything.
    pub only: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            format: "compact".to_string(),
            file: None,
            only: Vec::new(),
        }
    }
}

/// Driver section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DriverSection {
    pub iterations: Option<u64>,
    pub seed: Option<u64>,
    pub delay_ms: u64,
}

/// Discover the economy.toml config file in `dir`.
pub fn discover_config(dir: &Path) -> Option<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Load and parse a config file.
pub fn load_config(path: &Path) -> anyhow::Result<EconomyConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path.display()))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<EconomyConfig> {
    let config: EconomyConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// A config together with the file it came from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: EconomyConfig,
    pub path: Option<PathBuf>,
}

/// Load the explicit config if given, else the discovered one, else defaults.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<LoadedConfig> {
    match explicit.map(Path::to_path_buf).or_else(|| discover_config(dir)) {
        Some(path) => Ok(LoadedConfig {
            config: load_config(&path)?,
            path: Some(path),
        }),
        None => Ok(LoadedConfig::default()),
    }
}

/// Logging and data settings after merging CLI arguments over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedSettings {
    pub data: Option<PathBuf>,
    pub level: String,
    pub format: String,
    pub log_file: Option<PathBuf>,
    pub only: Vec<String>,
}

/// Global CLI overrides; `None`/empty means "not given on the command line".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data: Option<PathBuf>,
    pub level: Option<String>,
    pub format: Option<String>,
    pub log_file: Option<PathBuf>,
    pub only: Vec<String>,
}

pub fn merge(config: &EconomyConfig, overrides: Overrides) -> MergedSettings {
    MergedSettings {
        data: overrides.data.or_else(|| config.data.clone()),
        level: overrides
            .level
            .unwrap_or_else(|| config.logging.level.clone()),
        format: overrides
            .format
            .unwrap_or_else(|| config.logging.format.clone()),
        log_file: overrides.log_file.or_else(|| config.logging.file.clone()),
        only: if overrides.only.is_empty() {
            config.logging.only.clone()
        } else {
            overrides.only
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_full_config() {
        let contents = r#"
data = "economies/reference.ron"

[logging]
level = "info"
format = "json"
file = "economy.log"
only = ["make", "mine_iron", "kill_cow"]

[driver]
iterations = 10
seed = 42
delay_ms = 250
"#;
        let config = parse_config(contents).unwrap();
        assert_eq!(config.data, Some(PathBuf::from("economies/reference.ron")));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.only.len(), 3);
        assert_eq!(config.driver.iterations, Some(10));
        assert_eq!(config.driver.seed, Some(42));
        assert_eq!(config.driver.delay_ms, 250);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.data.is_none());
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
        assert!(config.logging.only.is_empty());
        assert_eq!(config.driver.delay_ms, 0);
    }

    #[test]
    fn invalid_toml_rejected() {
        assert!(parse_config("[logging\nlevel = ").is_err());
    }

    #[test]
    fn discover_in_directory() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).is_none());

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[logging]\nlevel = \"warn\"\n").unwrap();
        let loaded = load_or_default(None, dir.path()).unwrap();
        assert_eq!(loaded.config.logging.level, "warn");
        assert_eq!(loaded.path, Some(dir.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn explicit_path_wins_over_discovery() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[logging]\nlevel = \"warn\"\n").unwrap();
        let explicit = dir.path().join("other.toml");
        std::fs::write(&explicit, "[logging]\nlevel = \"trace\"\n").unwrap();

        let loaded = load_or_default(Some(&explicit), dir.path()).unwrap();
        assert_eq!(loaded.config.logging.level, "trace");
        assert_eq!(loaded.path, Some(explicit));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = load_or_default(None, dir.path()).unwrap();
        assert!(loaded.path.is_none());
        assert_eq!(loaded.config.logging.level, "debug");
    }

    #[test]
    fn shipped_config_restricts_to_whitelist() {
        let config = parse_config(include_str!("../../../economy.toml")).unwrap();
        assert_eq!(config.logging.only, vec!["make", "mine_iron", "kill_cow"]);
        assert!(config.data.is_none());
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let config = parse_config(
            r#"
[logging]
level = "info"
only = ["make"]
"#,
        )
        .unwrap();

        let merged = merge(
            &config,
            Overrides {
                level: Some("debug".to_string()),
                ..Overrides::default()
            },
        );
        assert_eq!(merged.level, "debug");
        assert_eq!(merged.format, "compact");
        assert_eq!(merged.only, vec!["make".to_string()]);

        let merged = merge(
            &config,
            Overrides {
                only: vec!["kill_cow".to_string()],
                ..Overrides::default()
            },
        );
        assert_eq!(merged.level, "info");
        assert_eq!(merged.only, vec!["kill_cow".to_string()]);
    }
}
