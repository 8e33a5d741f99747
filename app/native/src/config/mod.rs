//! Configuration module for Flamingo.
//!
//! The engine itself takes an [`EngineConfig`] value; this module only finds
//! and reads one from disk for the command-line tool.

pub mod types;

use std::path::{Path, PathBuf};

pub use types::{
    ConfigError, EngineConfig, config_paths, load_config, load_config_from_path, parse_config,
};

/// Loads the configuration, falling back to defaults when none is usable.
///
/// A custom path (from `--config`) replaces the search paths. Returns the
/// path the configuration was read from, if any.
///
/// # Errors
///
/// Returns an error only when a custom path was given and could not be
/// loaded. Problems with files found through the search paths are logged and
/// replaced by defaults.
pub fn load_or_default(
    custom: Option<&Path>,
) -> Result<(EngineConfig, Option<PathBuf>), ConfigError> {
    if let Some(path) = custom {
        let (config, path) = load_config_from_path(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        return Ok((config, Some(path)));
    }

    match load_config() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok((config, Some(path)))
        }
        Err(ConfigError::NotFound) => {
            tracing::debug!("no configuration file found, using defaults");
            Ok((EngineConfig::default(), None))
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to load configuration, using defaults");
            Ok((EngineConfig::default(), None))
        }
    }
}
