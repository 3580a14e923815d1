//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{validate_message_prefix, ProjectConfig};
use crate::{ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.treetest/config.toml) - lowest priority
/// 2. Project config (./treetest.toml) - overrides global
/// 3. Environment variables (TREETEST_*) - overrides project
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration (with environment overrides applied)
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where treetest.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader reading the global config from `path` instead of the home directory
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find treetest.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;

        // Global config is optional and never fatal
        let global_config = self.load_global_config().unwrap_or_default();

        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config().unwrap_or_default();
        let project_config = self.apply_env_overrides(project_config)?;

        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config); the default config when none is found
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration from ~/.treetest/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Apply environment variable overrides to project config
    ///
    /// Recognized: TREETEST_HOSTED, TREETEST_EXIT_ON_FAILURE, TREETEST_MESSAGE_PREFIX,
    /// TREETEST_SHOW_PASSED, TREETEST_COLOR
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Some(hosted) = env_flag("TREETEST_HOSTED") {
            config.runner_mut().hosted = Some(hosted);
        }

        if let Some(exit) = env_flag("TREETEST_EXIT_ON_FAILURE") {
            config.runner_mut().exit_on_failure = Some(exit);
        }

        if let Ok(prefix) = env::var("TREETEST_MESSAGE_PREFIX") {
            validate_message_prefix(&prefix)?;
            config.runner_mut().message_prefix = Some(prefix);
        }

        if let Some(show) = env_flag("TREETEST_SHOW_PASSED") {
            config.reporter_mut().show_passed_assertions = Some(show);
        }

        if let Some(color) = env_flag("TREETEST_COLOR") {
            config.reporter_mut().color = Some(color);
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes"))
}

impl Config {
    /// Whether tests run inside the hosted environment (default: false)
    pub fn hosted(&self) -> bool {
        self.project
            .runner
            .as_ref()
            .and_then(|r| r.hosted)
            .unwrap_or(false)
    }

    /// Whether a failing suite terminates the process (default: true)
    pub fn exit_on_failure(&self) -> bool {
        self.project
            .runner
            .as_ref()
            .and_then(|r| r.exit_on_failure)
            .unwrap_or(true)
    }

    /// Prefix for `Test::log` messages (default: empty)
    pub fn message_prefix(&self) -> &str {
        self.project
            .runner
            .as_ref()
            .and_then(|r| r.message_prefix.as_deref())
            .unwrap_or("")
    }

    /// Whether passed assertions are printed (project > global > false)
    pub fn show_passed_assertions(&self) -> bool {
        self.project
            .reporter
            .as_ref()
            .and_then(|r| r.show_passed_assertions)
            .or_else(|| {
                self.global
                    .reporter
                    .as_ref()
                    .and_then(|r| r.show_passed_assertions)
            })
            .unwrap_or(false)
    }

    /// Whether report lines are colorized (project > global > true)
    pub fn color(&self) -> bool {
        self.project
            .reporter
            .as_ref()
            .and_then(|r| r.color)
            .or_else(|| self.global.reporter.as_ref().and_then(|r| r.color))
            .unwrap_or(true)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a treetest.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
