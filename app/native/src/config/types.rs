//! Configuration types and file loading.
//!
//! Configuration files are JSONC (JSON with `//` and `/* */` comments).

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::config::{APP_DIR, FILE_NAMES};
use crate::constants::snapping::DEFAULT_SNAP_DISTANCE;

/// Engine tuning.
///
/// # Example
///
/// ```json
/// {
///   "snapDistance": 20,
///   "strictReopen": false
/// }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Maximum gap, in pixels, that snapping closes and that still counts as
    /// touching.
    ///
    /// Default: 20
    pub snap_distance: i64,

    /// Reject `Open_Window` on an already open window with `AlreadyOpen`
    /// instead of ignoring it.
    ///
    /// Default: false
    pub strict_reopen: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_distance: DEFAULT_SNAP_DISTANCE,
            strict_reopen: false,
        }
    }
}

impl EngineConfig {
    /// Check that the values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a negative snap distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.snap_distance < 0 {
            return Err(ConfigError::Invalid(format!(
                "snapDistance must be zero or positive, got {}",
                self.snap_distance
            )));
        }
        Ok(())
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    #[error(
        "No configuration file found. Expected at ~/.config/flamingo/config.jsonc or \
         ~/.config/flamingo/config.json"
    )]
    NotFound,

    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file contains invalid JSON.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but holds unusable values.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/flamingo/` when the variable is set
/// 2. `~/.config/flamingo/`
/// 3. the platform config directory (`~/Library/Application Support/flamingo/`
///    on macOS)
///
/// Each location is probed for `config.jsonc`, then `config.json`.
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut dirs_to_probe = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        dirs_to_probe.push(PathBuf::from(xdg_config).join(APP_DIR));
    }
    if let Some(home) = dirs::home_dir() {
        dirs_to_probe.push(home.join(".config").join(APP_DIR));
    }
    if let Some(config_dir) = dirs::config_dir() {
        dirs_to_probe.push(config_dir.join(APP_DIR));
    }

    let mut paths = Vec::new();
    for dir in dirs_to_probe {
        for filename in FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }
    paths
}

/// Parses and validates a configuration from a JSONC reader.
///
/// # Errors
///
/// Returns `ConfigError::Parse` for invalid JSON and `ConfigError::Invalid`
/// for values that fail validation.
pub fn parse_config(reader: impl Read) -> Result<EngineConfig, ConfigError> {
    let reader = json_comments::StripComments::new(reader);
    let config: EngineConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration from a specific path.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::Io` if it cannot be read, and `ConfigError::Parse` or
/// `ConfigError::Invalid` if its content is unusable.
pub fn load_config_from_path(path: &Path) -> Result<(EngineConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }
    let file = fs::File::open(path)?;
    let config = parse_config(file)?;
    Ok((config, path.to_path_buf()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, or the error of the first file found.
pub fn load_config() -> Result<(EngineConfig, PathBuf), ConfigError> {
    config_paths()
        .into_iter()
        .find(|path| path.exists())
        .map_or(Err(ConfigError::NotFound), |path| load_config_from_path(&path))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.snap_distance, DEFAULT_SNAP_DISTANCE);
        assert!(!config.strict_reopen);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_jsonc_with_comments() {
        let input = r#"{
            // Pull edges together from further away.
            "snapDistance": 32,
            /* Treat duplicate opens as errors. */
            "strictReopen": true
        }"#;

        let config = parse_config(input.as_bytes()).unwrap();
        assert_eq!(config, EngineConfig { snap_distance: 32, strict_reopen: true });
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = parse_config(r#"{ "strictReopen": true }"#.as_bytes()).unwrap();
        assert_eq!(config.snap_distance, DEFAULT_SNAP_DISTANCE);
    }

    #[test]
    fn test_negative_snap_distance_is_invalid() {
        let err = parse_config(r#"{ "snapDistance": -1 }"#.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_config("{ snapDistance: }".as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ "snapDistance": 8 }}"#).unwrap();

        let (config, path) = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.snap_distance, 8);
        assert_eq!(path, file.path());
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from_path(&dir.path().join("nope.jsonc")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound));
    }

    #[test]
    fn test_config_paths_are_not_empty() {
        let paths = config_paths();
        assert!(paths.iter().all(|path| path.to_string_lossy().contains(APP_DIR)));
    }
}
