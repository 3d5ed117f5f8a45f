//! Collection diagnostics.
//!
//! Every source routine receives its diagnostics record as an explicit
//! `&mut` parameter and writes to it on every path (success, expected
//! absence, failure) before returning. The aggregate record is attached
//! to the bundle whether or not anything was collected.

use std::collections::BTreeMap;
use std::io;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One directory examined while looking for log files.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchedPath {
    pub path: String,
    pub exists: bool,
    pub accessible: bool,
    pub file_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Diagnostics for one log source (file logs or journal).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LogSourceDiagnostics {
    pub attempted: bool,
    pub successful: bool,
    pub entries_found: usize,
    pub error: Option<String>,
    pub paths_searched: Vec<SearchedPath>,
    pub details: BTreeMap<String, Value>,
}

impl LogSourceDiagnostics {
    /// Mark the source as attempted. Called on entry to a source routine.
    pub fn begin(&mut self) {
        self.attempted = true;
        self.successful = false;
        self.error = None;
    }

    pub fn record_success(&mut self, entries_found: usize) {
        self.successful = true;
        self.entries_found = entries_found;
        self.error = None;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.successful = false;
        self.error = Some(error.into());
    }

    pub fn add_detail(&mut self, key: &str, value: impl Into<Value>) {
        self.details.insert(key.to_string(), value.into());
    }

    pub fn add_searched_path(&mut self, searched: SearchedPath) {
        self.paths_searched.push(searched);
    }
}

/// Time window covered by the collected logs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Aggregate across all log sources.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DiagnosticSummary {
    pub total_entries: usize,
    pub time_range: Option<TimeRange>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LogCollectionDiagnostics {
    pub journal_logs: LogSourceDiagnostics,
    pub file_logs: LogSourceDiagnostics,
    pub summary: DiagnosticSummary,
}

impl LogCollectionDiagnostics {
    /// Fill in the summary from the per-source records.
    pub fn summarize(&mut self, from: DateTime<Utc>, to: DateTime<Utc>) {
        self.summary = DiagnosticSummary {
            total_entries: self.journal_logs.entries_found + self.file_logs.entries_found,
            time_range: Some(TimeRange { from, to }),
        };
    }
}

/// Generic attempted/successful/error record for config and system info.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DiagnosticInfo {
    pub attempted: bool,
    pub successful: bool,
    pub error: Option<String>,
}

impl DiagnosticInfo {
    pub fn begin(&mut self) {
        self.attempted = true;
        self.successful = false;
        self.error = None;
    }

    pub fn record_success(&mut self) {
        self.successful = true;
        self.error = None;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.successful = false;
        self.error = Some(error.into());
    }
}

/// Complete diagnostics record of a collection run.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CollectionDiagnostics {
    pub log_collection: LogCollectionDiagnostics,
    pub config_collection: DiagnosticInfo,
    pub system_collection: DiagnosticInfo,
}

/// Actionable hint for a permission failure, if the error is one.
pub fn permission_hint(err: &io::Error) -> Option<&'static str> {
    if err.kind() != io::ErrorKind::PermissionDenied {
        return None;
    }
    if cfg!(target_os = "linux") {
        Some("permission denied: run with sudo or add the user to the 'adm'/'systemd-journal' group")
    } else if cfg!(target_os = "windows") {
        Some("permission denied: run as Administrator")
    } else {
        Some("permission denied: run with sudo or grant the terminal Full Disk Access")
    }
}
