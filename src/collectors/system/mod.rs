//! System information collection
//!
//! Gathers OS, CPU, memory and disk facts through the sysinfo crate. The
//! collector consumes them through the [`SystemInfoSource`] trait so tests
//! can substitute fixed values.

mod collector;
pub mod models;

#[cfg(test)]
pub use collector::MockSystemInfoSource;
pub use collector::{SysinfoSource, SystemInfoSource};
pub use models::SystemInfo;
