//! Utility functions for bundle output.
//!
//! ## Components
//!
//! - **Archive**: ZIP assembly of a collected bundle
//! - **Hashing**: SHA-256 digests used for anonymized identifiers
//!
//! ## Common Use Cases
//!
//! ### Writing a bundle archive
//!
//! ```no_run
//! use support_bundle::utils::archive::create_archive;
//! use support_bundle::models::Bundle;
//! use std::path::Path;
//!
//! # fn example(bundle: &Bundle) -> Result<(), support_bundle::error::ArchiveError> {
//! let path = create_archive(bundle, Path::new("/tmp/support"))?;
//! println!("Created archive: {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ### Short digests
//!
//! ```
//! use support_bundle::utils::hash::short_digest;
//!
//! assert_eq!(short_digest("hello world", 6), "b94d27");
//! ```

/// Bundle archive creation
pub mod archive;

/// Cryptographic hash calculation utilities
pub mod hash;
