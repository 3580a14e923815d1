//! Project Configuration (treetest.toml)
//!
//! Handles project-level configuration stored in `treetest.toml` at the project root.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration from treetest.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Execution settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runner: Option<RunnerConfig>,

    /// Default reporter settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporter: Option<ReporterConfig>,
}

/// Execution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Whether the run happens inside the hosted environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted: Option<bool>,

    /// Terminate the process with code 1 when a test fails (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_on_failure: Option<bool>,

    /// Prefix prepended to every `Test::log` message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_prefix: Option<String>,
}

/// Default reporter settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    /// Also print passed assertions under each test (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_passed_assertions: Option<bool>,

    /// Colorize PASSED/FAILED lines (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(prefix) = self.runner.as_ref().and_then(|r| r.message_prefix.as_ref()) {
            validate_message_prefix(prefix)?;
        }
        Ok(())
    }

    /// Runner section, created on first access
    pub fn runner_mut(&mut self) -> &mut RunnerConfig {
        self.runner.get_or_insert_with(RunnerConfig::default)
    }

    /// Reporter section, created on first access
    pub fn reporter_mut(&mut self) -> &mut ReporterConfig {
        self.reporter.get_or_insert_with(ReporterConfig::default)
    }
}

/// Message prefixes end up inside single report lines
pub(crate) fn validate_message_prefix(prefix: &str) -> ConfigResult<()> {
    if prefix.contains(['\n', '\r']) {
        return Err(ConfigError::InvalidValue {
            field: "runner.message_prefix".to_string(),
            reason: "must not contain line breaks".to_string(),
        });
    }
    Ok(())
}
