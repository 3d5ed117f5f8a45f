//! Redaction of sensitive data before it leaves the collection pipeline.
//!
//! This module provides:
//! - Free-text scrubbing of log lines and error messages
//! - IP address classification and anonymization
//! - Structured scrubbing of nested configuration

pub mod config_scrubber;
pub mod credential_scrubber;
pub mod ip_anonymizer;

pub use config_scrubber::{default_sensitive_keys, ConfigScrubber};
pub use credential_scrubber::{safe_error_message, scrub_message, strip_url_credentials};
pub use ip_anonymizer::{anonymize_ip, classify_ip, IpClass};
