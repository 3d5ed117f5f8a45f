//! Configuration source consumed by the collector.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde_json::Value;

/// Supplies the raw structured configuration of the application.
///
/// The returned value is unscrubbed; the collector scrubs it before it
/// reaches a bundle.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load(&self) -> Result<Value>;
}

/// Reads a YAML configuration file.
#[derive(Debug, Clone)]
pub struct YamlConfigSource {
    path: PathBuf,
}

impl YamlConfigSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ConfigSource for YamlConfigSource {
    async fn load(&self) -> Result<Value> {
        debug!("Loading configuration from {}", self.path.display());

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read config file {}", self.path.display()))?;

        let value: Value = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", self.path.display()))?;

        Ok(value)
    }
}
