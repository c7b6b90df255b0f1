// src/config/model.rs

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::classify::ClassifierConfig;
use crate::operation::{CREATE_KNOWN_ERRORS, READ_DELETE_KNOWN_ERRORS};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [server]
/// bind_addr = "0.0.0.0:8080"
///
/// [scripts]
/// dir = "/opt/tfstack"
/// shell = "/bin/sh"
/// create = "./create_tfstack.sh"
///
/// [classifier]
/// success_marker = "resource_id"
/// id_pattern = '"([^"]*)"'
///
/// [classifier.known_errors]
/// create = ["error:ExistingWorkspaceContainsResources"]
///
/// [jobs]
/// max_concurrent = 4
/// timeout = "30m"
/// result_ttl = "24h"
/// ```
///
/// All sections are optional; only `scripts.dir` has no default and must be
/// provided by the file, the `TF_DIR` environment variable or `--tf-dir`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub scripts: ScriptsSection,

    #[serde(default)]
    pub classifier: ClassifierSection,

    #[serde(default)]
    pub jobs: JobsSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// `[scripts]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptsSection {
    /// Working directory the scripts are run in.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Interpreter used to run the scripts. An empty string runs the scripts
    /// directly (they must then be executable).
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default = "default_create_script")]
    pub create: String,

    #[serde(default = "default_read_script")]
    pub read: String,

    #[serde(default = "default_delete_script")]
    pub delete: String,
}

fn default_shell() -> String {
    "/bin/sh".to_string()
}

fn default_create_script() -> String {
    "./create_tfstack.sh".to_string()
}

fn default_read_script() -> String {
    "./read_tfstack.sh".to_string()
}

fn default_delete_script() -> String {
    "./delete_tfstack.sh".to_string()
}

impl Default for ScriptsSection {
    fn default() -> Self {
        Self {
            dir: None,
            shell: default_shell(),
            create: default_create_script(),
            read: default_read_script(),
            delete: default_delete_script(),
        }
    }
}

/// `[classifier]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSection {
    /// Substring identifying the line that carries the created resource id.
    #[serde(default = "default_success_marker")]
    pub success_marker: String,

    /// Regex with exactly one capture group, applied to the marker line.
    #[serde(default = "default_id_pattern")]
    pub id_pattern: String,

    #[serde(default)]
    pub known_errors: KnownErrorsSection,
}

fn default_success_marker() -> String {
    "resource_id".to_string()
}

fn default_id_pattern() -> String {
    r#""([^"]*)""#.to_string()
}

impl Default for ClassifierSection {
    fn default() -> Self {
        Self {
            success_marker: default_success_marker(),
            id_pattern: default_id_pattern(),
            known_errors: KnownErrorsSection::default(),
        }
    }
}

/// `[classifier.known_errors]` section: ordered signatures per operation.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownErrorsSection {
    #[serde(default = "default_create_errors")]
    pub create: Vec<String>,

    #[serde(default = "default_read_delete_errors")]
    pub read: Vec<String>,

    #[serde(default = "default_read_delete_errors")]
    pub delete: Vec<String>,
}

fn default_create_errors() -> Vec<String> {
    CREATE_KNOWN_ERRORS.iter().map(|s| s.to_string()).collect()
}

fn default_read_delete_errors() -> Vec<String> {
    READ_DELETE_KNOWN_ERRORS.iter().map(|s| s.to_string()).collect()
}

impl Default for KnownErrorsSection {
    fn default() -> Self {
        Self {
            create: default_create_errors(),
            read: default_read_delete_errors(),
            delete: default_read_delete_errors(),
        }
    }
}

/// `[jobs]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobsSection {
    /// Maximum number of scripts running at the same time.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Optional deadline per job (e.g. `"30m"`). Unset means no deadline.
    #[serde(default)]
    pub timeout: Option<String>,

    /// How long finished jobs stay queryable.
    #[serde(default = "default_result_ttl")]
    pub result_ttl: String,

    /// How often expired jobs are evicted.
    #[serde(default = "default_reap_interval")]
    pub reap_interval: String,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_result_ttl() -> String {
    "24h".to_string()
}

fn default_reap_interval() -> String {
    "60s".to_string()
}

impl Default for JobsSection {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            timeout: None,
            result_ttl: default_result_ttl(),
            reap_interval: default_reap_interval(),
        }
    }
}

/// Values that take precedence over the file (CLI flags, then environment).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub tf_dir: Option<PathBuf>,
    pub bind_addr: Option<String>,
}

impl ConfigOverrides {
    /// Environment variable naming the scripts directory.
    pub const TF_DIR_ENV: &'static str = "TF_DIR";

    /// Combine CLI values with the environment; CLI wins.
    pub fn from_cli_and_env(tf_dir: Option<PathBuf>, bind_addr: Option<String>) -> Self {
        let tf_dir = tf_dir.or_else(|| {
            std::env::var_os(Self::TF_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        });
        Self { tf_dir, bind_addr }
    }
}

impl RawConfigFile {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(dir) = &overrides.tf_dir {
            self.scripts.dir = Some(dir.clone());
        }
        if let Some(addr) = &overrides.bind_addr {
            self.server.bind_addr = addr.clone();
        }
    }
}

/// Validated configuration used by the rest of the application.
///
/// Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub scripts: ScriptSettings,
    pub classifiers: ClassifierSettings,
    pub jobs: JobSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct ScriptSettings {
    pub dir: PathBuf,
    pub shell: Option<String>,
    pub create: String,
    pub read: String,
    pub delete: String,
}

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub create: ClassifierConfig,
    pub read: ClassifierConfig,
    pub delete: ClassifierConfig,
}

#[derive(Debug, Clone)]
pub struct JobSettings {
    pub max_concurrent: usize,
    pub timeout: Option<Duration>,
    pub result_ttl: Duration,
    pub reap_interval: Duration,
}
