//! Error taxonomy for support bundle collection.
//!
//! Only [`CollectError`] ever escapes a collection call. Source-level
//! failures such as [`JournalError`] are absorbed into diagnostics.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Errors surfaced to the caller of a collection run.
#[derive(Error, Debug)]
pub enum CollectError {
    /// None of logs, config or system information was requested
    #[error("no collection type requested: enable at least one of logs, config or system info")]
    NothingRequested,

    /// The final archive could not be produced
    #[error("failed to assemble support bundle: {0}")]
    Assembly(#[from] ArchiveError),
}

/// Errors raised while querying the system journal.
#[derive(Error, Debug)]
pub enum JournalError {
    /// The journal facility or the service unit does not exist on this host
    #[error("system journal not available: {reason}")]
    NotAvailable { reason: String },

    /// The query did not finish before its deadline
    #[error("journal query timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the collection run
    #[error("journal query cancelled")]
    Cancelled,

    /// The query ran but exited unsuccessfully
    #[error("journal query failed ({status}): {stderr}")]
    CommandFailed { status: String, stderr: String },

    /// Spawning or talking to the query process failed
    #[error("journal query I/O error: {0}")]
    Io(#[from] io::Error),
}

impl JournalError {
    /// Whether this is the expected "no journal on this host" condition.
    pub fn is_not_available(&self) -> bool {
        matches!(self, JournalError::NotAvailable { .. })
    }
}

/// Errors raised while writing the bundle archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CollectError>;
