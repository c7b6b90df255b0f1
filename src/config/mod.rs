// src/config/mod.rs

//! Configuration loading and validation for tfstack.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and apply CLI/env overrides (`loader.rs`).
//! - Validate it into typed settings (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_from_path, load_raw};
pub use model::{
    ClassifierSettings, ConfigFile, ConfigOverrides, JobSettings, RawConfigFile, ScriptSettings,
    ServerSettings,
};
