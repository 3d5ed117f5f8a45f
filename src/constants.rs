//! Global constants for the support bundle collector.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Collection defaults
/// Default application name used for service and directory lookups
pub const DEFAULT_APP_NAME: &str = "support-app";

/// Default time window for log collection (24 hours)
pub const DEFAULT_LOG_DURATION_HOURS: u64 = 24;

/// Default byte budget for collected log files (10MB)
pub const DEFAULT_MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum directory depth walked below each log directory
pub const LOG_WALK_MAX_DEPTH: usize = 3;

/// Suffix every log file name must end with (compared lowercased)
pub const LOG_FILE_SUFFIX: &str = "log";

/// Relative log directory name searched under every root
pub const LOG_DIR_NAME: &str = "logs";

/// Name of the configuration file loaded from the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

// Journal constants
/// Default command used to query the system journal
pub const DEFAULT_JOURNAL_COMMAND: &str = "journalctl";

/// Default journal query timeout in seconds
pub const DEFAULT_JOURNAL_TIMEOUT_SECS: u64 = 30;

/// Source name attached to journal entries
pub const JOURNAL_SOURCE: &str = "journal";

/// Bytes of journal stderr kept for error classification
pub const JOURNAL_STDERR_LIMIT: u64 = 64 * 1024;

/// Time format accepted by `journalctl --since`
pub const JOURNAL_SINCE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Redaction tokens
pub const REDACTED: &str = "[REDACTED]";
pub const TOKEN_PLACEHOLDER: &str = "[TOKEN]";
pub const EMAIL_PLACEHOLDER: &str = "[EMAIL]";
pub const UUID_PLACEHOLDER: &str = "[UUID]";

/// Number of hex characters kept from an anonymization digest
pub const ANONYMIZED_HASH_LEN: usize = 8;

/// Number of hex characters kept from the host name digest
pub const SYSTEM_ID_HASH_LEN: usize = 12;

// Archive layout
pub const ARCHIVE_LOGS_DIR: &str = "logs";
pub const ARCHIVE_CONFIG_DIR: &str = "config";
pub const ARCHIVE_SYSTEM_DIR: &str = "system";
pub const ARCHIVE_README_NAME: &str = "README.txt";
pub const ARCHIVE_METADATA_NAME: &str = "metadata.json";
pub const ARCHIVE_DIAGNOSTICS_NAME: &str = "diagnostics.json";
pub const ARCHIVE_CONFIG_NAME: &str = "config.yaml";
pub const ARCHIVE_SYSTEM_NAME: &str = "system_info.json";
pub const ARCHIVE_JOURNAL_NAME: &str = "journal.log";

// Placeholder notes
pub const NO_LOGS_NOTE: &str =
    "No log files were found or all logs were older than the specified duration.";
pub const NO_CONFIG_NOTE: &str =
    "Configuration could not be collected. See diagnostics.json for details.";
pub const NO_SYSTEM_INFO_NOTE: &str =
    "System information could not be collected. See diagnostics.json for details.";

// Default file names
pub const DEFAULT_SETTINGS_NAME: &str = "support.yaml";
pub const ARCHIVE_NAME_PREFIX: &str = "support";
