//! Log, configuration and system information collection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               Collector                 │
//! ├─────────────────────────────────────────┤
//! │              Log sources                │
//! │  ┌───────────────┬─────────────────┐    │
//! │  │   File logs   │     Journal     │    │
//! │  └───────────────┴─────────────────┘    │
//! ├─────────────────────────────────────────┤
//! │             Collaborators               │
//! │  ┌───────────────┬─────────────────┐    │
//! │  │ ConfigSource  │ SystemInfoSource│    │
//! │  └───────────────┴─────────────────┘    │
//! ├─────────────────────────────────────────┤
//! │     Diagnostics  →  Bundle archive      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Every source writes its outcome into the run's diagnostics record. Only
//! an empty request or a failed archive write is reported as an error.
//!
//! ## Usage Example
//!
//! ```no_run
//! use support_bundle::collectors::Collector;
//! use support_bundle::models::CollectorOptions;
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), support_bundle::error::CollectError> {
//! let collector = Collector::new(Path::new("/etc/myapp"), Path::new("/var/lib/myapp"));
//! let (bundle, path) = collector
//!     .collect_archive(&CancellationToken::new(), &CollectorOptions::default(), Path::new("."))
//!     .await?;
//!
//! println!("{} entries written to {}", bundle.logs.len(), path.display());
//! # Ok(())
//! # }
//! ```

/// Collection orchestration
pub mod collector;

/// Diagnostics records filled by every source
pub mod diagnostics;

/// On-disk log file collection
pub mod file_logs;

/// System journal collection
pub mod journal;

/// Line level and timestamp parsing
pub mod log_line;

/// Log directory resolution
pub mod paths;

/// Configuration sources
pub mod sources;

/// Host facts
pub mod system;

pub use collector::Collector;
