use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collectors::diagnostics::CollectionDiagnostics;
use crate::collectors::system::models::SystemInfo;
use crate::constants::{DEFAULT_LOG_DURATION_HOURS, DEFAULT_MAX_LOG_SIZE};
use crate::error::CollectError;

/// A single scrubbed log line.
///
/// `text` is always post-scrub: collectors redact a line before building
/// the entry, so raw text never outlives the read that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub level: Option<String>,
    pub text: String,
}

/// Per-call collection options. Immutable for the duration of a run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CollectorOptions {
    pub include_logs: bool,
    pub include_config: bool,
    pub include_system_info: bool,
    pub log_duration: Duration,
    pub max_log_size: u64,
    /// Include debug-priority journal records
    #[serde(default)]
    pub verbose: bool,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            include_logs: true,
            include_config: true,
            include_system_info: true,
            log_duration: Duration::from_secs(DEFAULT_LOG_DURATION_HOURS * 3600),
            max_log_size: DEFAULT_MAX_LOG_SIZE,
            verbose: false,
        }
    }
}

impl CollectorOptions {
    /// Reject option sets that request nothing.
    pub fn validate(&self) -> Result<(), CollectError> {
        if !self.include_logs && !self.include_config && !self.include_system_info {
            return Err(CollectError::NothingRequested);
        }
        Ok(())
    }
}

/// The product of a collection run, handed to the archive writer.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Bundle {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub collector_version: String,
    pub system_id: String,
    pub options: CollectorOptions,
    pub logs: Vec<LogEntry>,
    pub config: Option<serde_json::Value>,
    pub system_info: Option<SystemInfo>,
    pub diagnostics: CollectionDiagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_one_section() {
        let none = CollectorOptions {
            include_logs: false,
            include_config: false,
            include_system_info: false,
            ..Default::default()
        };
        assert!(matches!(none.validate(), Err(CollectError::NothingRequested)));

        for (logs, config, system) in [(true, false, false), (false, true, false), (false, false, true)] {
            let opts = CollectorOptions {
                include_logs: logs,
                include_config: config,
                include_system_info: system,
                ..Default::default()
            };
            assert!(opts.validate().is_ok());
        }
    }

    #[test]
    fn test_default_options() {
        let opts = CollectorOptions::default();
        assert_eq!(opts.log_duration, Duration::from_secs(24 * 3600));
        assert_eq!(opts.max_log_size, 10 * 1024 * 1024);
        assert!(!opts.verbose);
    }
}
