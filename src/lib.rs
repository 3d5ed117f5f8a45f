//! # support-bundle
//!
//! Collects recent logs, configuration and system facts of a running
//! application into a single archive that can be handed to support staff
//! without leaking secrets, network topology or credentials.
//!
//! ## Overview
//!
//! A collection run gathers log lines from on-disk log files and, where
//! available, the system journal. It optionally adds the application's
//! structured configuration and a description of the host. Every piece of
//! text is scrubbed before it is kept, and every source records what it did
//! in a diagnostics record that travels with the bundle.
//!
//! ## Features
//!
//! - **Log files**: newest-first collection under a time window and byte budget
//! - **Journal**: bounded `journalctl` queries with timeout and cancellation
//! - **Scrubbing**: credentials, tokens, emails, UUIDs and IP addresses
//! - **Config redaction**: sensitive keys at any depth become `[REDACTED]`
//! - **Diagnostics**: per-source outcome, searched paths and hints
//! - **Archive**: ZIP bundle with placeholder notes for empty sections
//!
//! ## Usage
//!
//! ```no_run
//! use support_bundle::collectors::Collector;
//! use support_bundle::models::CollectorOptions;
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let collector = Collector::new(Path::new("/etc/myapp"), Path::new("/var/lib/myapp"));
//! let options = CollectorOptions {
//!     include_system_info: false,
//!     ..Default::default()
//! };
//!
//! let bundle = collector.collect(&CancellationToken::new(), &options).await?;
//! println!("Collected {} log entries", bundle.logs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Core data models
//! - [`collectors`]: Log, config and system collection plus diagnostics
//! - [`config`]: Settings files and environment variable expansion
//! - [`utils`]: Archive assembly and hashing
//! - [`security`]: Scrubbing and IP anonymization
//! - [`error`]: Error types
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Log, configuration and system information collectors
pub mod collectors;

/// Utility functions for archives and hashing
pub mod utils;

/// Settings management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Error types
pub mod error;

/// Scrubbing of logs, errors and configuration
pub mod security;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
