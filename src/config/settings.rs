use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::env_vars::{expand_env_vars, normalize_path_for_os};
use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_APP_NAME, DEFAULT_JOURNAL_COMMAND, DEFAULT_JOURNAL_TIMEOUT_SECS,
    DEFAULT_LOG_DURATION_HOURS, DEFAULT_MAX_LOG_SIZE,
};
use crate::models::CollectorOptions;
use crate::security::default_sensitive_keys;

/// Static configuration of a support bundle collector.
///
/// Directory fields may contain `$VAR`, `${VAR}` or `%VAR%` references,
/// expanded when the path is requested.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SupportSettings {
    pub app_name: String,
    pub config_dir: String,
    pub data_dir: String,
    /// Journal unit; defaults to `<app_name>.service`
    pub service_name: Option<String>,
    pub journal_command: String,
    pub journal_timeout_secs: u64,
    pub sensitive_keys: Vec<String>,
    pub output_dir: String,
    pub include_logs: bool,
    pub include_config: bool,
    pub include_system_info: bool,
    pub log_duration_hours: u64,
    pub max_log_size_mb: u64,
}

impl Default for SupportSettings {
    fn default() -> Self {
        Self::for_app(DEFAULT_APP_NAME)
    }
}

impl SupportSettings {
    /// Defaults for an application, with platform directory conventions.
    pub fn for_app(app_name: &str) -> Self {
        let (config_dir, data_dir) = if cfg!(windows) {
            (
                format!("%APPDATA%\\{}", app_name),
                format!("%LOCALAPPDATA%\\{}", app_name),
            )
        } else if cfg!(target_os = "macos") {
            (
                format!("$HOME/Library/Application Support/{}", app_name),
                format!("$HOME/Library/Application Support/{}/data", app_name),
            )
        } else {
            (
                format!("$HOME/.config/{}", app_name),
                format!("$HOME/.local/share/{}", app_name),
            )
        };

        Self {
            app_name: app_name.to_string(),
            config_dir,
            data_dir,
            service_name: None,
            journal_command: DEFAULT_JOURNAL_COMMAND.to_string(),
            journal_timeout_secs: DEFAULT_JOURNAL_TIMEOUT_SECS,
            sensitive_keys: default_sensitive_keys(),
            output_dir: ".".to_string(),
            include_logs: true,
            include_config: true,
            include_system_info: true,
            log_duration_hours: DEFAULT_LOG_DURATION_HOURS,
            max_log_size_mb: DEFAULT_MAX_LOG_SIZE / (1024 * 1024),
        }
    }

    /// Load settings from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read settings file: {}", path.display()))?;

        let settings: SupportSettings =
            serde_yaml::from_str(&content).context("Failed to parse YAML settings")?;

        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize settings to YAML")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, yaml).context(format!("Failed to write settings to {}", path.display()))?;

        info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Load from `path` when given, otherwise fall back to the defaults.
    ///
    /// A path that is given but missing is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml_file(path),
            None => {
                info!("No settings file provided, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn service_name(&self) -> String {
        self.service_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| format!("{}.service", self.app_name))
    }

    pub fn config_path(&self) -> PathBuf {
        expand_path(&self.config_dir)
    }

    pub fn data_path(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        expand_path(&self.output_dir)
    }

    /// The configuration file collected into bundles.
    pub fn config_file(&self) -> PathBuf {
        self.config_path().join(CONFIG_FILE_NAME)
    }

    pub fn journal_timeout(&self) -> Duration {
        Duration::from_secs(self.journal_timeout_secs)
    }

    /// Per-call options built from the configured defaults.
    pub fn collector_options(&self) -> CollectorOptions {
        CollectorOptions {
            include_logs: self.include_logs,
            include_config: self.include_config,
            include_system_info: self.include_system_info,
            log_duration: Duration::from_secs(self.log_duration_hours.saturating_mul(3600)),
            max_log_size: self.max_log_size_mb.saturating_mul(1024 * 1024),
            verbose: false,
        }
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(normalize_path_for_os(&expand_env_vars(raw)))
}
