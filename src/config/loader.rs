// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, ConfigOverrides, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate. Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load the raw configuration.
///
/// - An explicit path must exist.
/// - Without one, [`default_config_path`] is used if present; otherwise all
///   defaults apply.
pub fn load_raw(path: Option<&Path>) -> Result<RawConfigFile> {
    match path {
        Some(path) => load_from_path(path),
        None => {
            let default = default_config_path();
            if default.is_file() {
                debug!(path = %default.display(), "loading default config file");
                load_from_path(default)
            } else {
                debug!("no config file found; using defaults");
                Ok(RawConfigFile::default())
            }
        }
    }
}

/// Load, apply overrides and validate.
///
/// This is the recommended entry point for the rest of the application.
pub fn load_and_validate(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ConfigFile> {
    let mut raw_config = load_raw(path)?;
    raw_config.apply_overrides(overrides);
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `tfstack.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("tfstack.toml")
}
