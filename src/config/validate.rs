// src/config/validate.rs

use std::net::SocketAddr;
use std::time::Duration;

use crate::classify::ClassifierConfig;
use crate::config::duration::parse_duration;
use crate::config::model::{
    ClassifierSection, ClassifierSettings, ConfigFile, JobSettings, JobsSection, RawConfigFile,
    ScriptSettings, ScriptsSection, ServerSettings,
};
use crate::errors::{Result, TfstackError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::TfstackError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let bind_addr: SocketAddr = raw.server.bind_addr.parse().map_err(|e| {
            TfstackError::ConfigError(format!(
                "[server].bind_addr '{}' is not a socket address: {}",
                raw.server.bind_addr, e
            ))
        })?;

        Ok(ConfigFile {
            server: ServerSettings { bind_addr },
            scripts: validate_scripts(raw.scripts)?,
            classifiers: validate_classifiers(&raw.classifier)?,
            jobs: validate_jobs(&raw.jobs)?,
        })
    }
}

fn validate_scripts(section: ScriptsSection) -> Result<ScriptSettings> {
    let dir = match section.dir {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => {
            return Err(TfstackError::ConfigError(
                "scripts directory is not set (use [scripts].dir, TF_DIR or --tf-dir)".to_string(),
            ));
        }
    };

    for (name, script) in [
        ("create", &section.create),
        ("read", &section.read),
        ("delete", &section.delete),
    ] {
        if script.trim().is_empty() {
            return Err(TfstackError::ConfigError(format!(
                "[scripts].{name} must not be empty"
            )));
        }
    }

    let shell = Some(section.shell.trim().to_string()).filter(|s| !s.is_empty());

    Ok(ScriptSettings {
        dir,
        shell,
        create: section.create,
        read: section.read,
        delete: section.delete,
    })
}

fn validate_classifiers(section: &ClassifierSection) -> Result<ClassifierSettings> {
    if section.success_marker.is_empty() {
        return Err(TfstackError::ConfigError(
            "[classifier].success_marker must not be empty".to_string(),
        ));
    }

    let build = |name: &str, known_errors: &[String]| -> Result<ClassifierConfig> {
        if known_errors.iter().any(|sig| sig.is_empty()) {
            return Err(TfstackError::ConfigError(format!(
                "[classifier.known_errors].{name} contains an empty signature"
            )));
        }
        ClassifierConfig::from_pattern(
            section.success_marker.clone(),
            &section.id_pattern,
            known_errors.to_vec(),
        )
    };

    Ok(ClassifierSettings {
        create: build("create", &section.known_errors.create)?,
        read: build("read", &section.known_errors.read)?,
        delete: build("delete", &section.known_errors.delete)?,
    })
}

fn validate_jobs(section: &JobsSection) -> Result<JobSettings> {
    if section.max_concurrent == 0 {
        return Err(TfstackError::ConfigError(
            "[jobs].max_concurrent must be >= 1 (got 0)".to_string(),
        ));
    }

    let timeout = section
        .timeout
        .as_deref()
        .map(|s| duration_field("timeout", s))
        .transpose()?;

    let result_ttl = duration_field("result_ttl", &section.result_ttl)?;
    let reap_interval = duration_field("reap_interval", &section.reap_interval)?;

    if reap_interval.is_zero() {
        return Err(TfstackError::ConfigError(
            "[jobs].reap_interval must be greater than zero".to_string(),
        ));
    }

    Ok(JobSettings {
        max_concurrent: section.max_concurrent,
        timeout,
        result_ttl,
        reap_interval,
    })
}

fn duration_field(name: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| TfstackError::ConfigError(format!("[jobs].{name}: {e}")))
}
