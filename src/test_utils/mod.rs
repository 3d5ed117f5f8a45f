//! Test utilities for support-bundle
//!
//! Fixture builders shared by the unit test modules.

#![cfg(test)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;

use crate::collectors::diagnostics::CollectionDiagnostics;
use crate::collectors::system::models::{CpuInfo, DiskInfo, MemoryInfo, SystemInfo};
use crate::models::{Bundle, CollectorOptions, LogEntry};

/// Write a log file, creating parent directories.
pub fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Set a file's modification time.
pub fn set_modified(path: &Path, time: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

/// Fixed host facts.
pub fn sample_system_info() -> SystemInfo {
    SystemInfo {
        os_name: Some("Linux".to_string()),
        os_version: Some("12".to_string()),
        kernel_version: Some("6.1.0".to_string()),
        architecture: "aarch64".to_string(),
        uptime_secs: 3600,
        cpu_info: CpuInfo {
            count: 4,
            brand: Some("Cortex-A76".to_string()),
            frequency: 2400,
        },
        memory: MemoryInfo {
            total_memory: 8 * 1024 * 1024 * 1024,
            used_memory: 2 * 1024 * 1024 * 1024,
            total_swap: 0,
            used_swap: 0,
        },
        disks: vec![DiskInfo {
            mount_point: "/".to_string(),
            file_system: Some("ext4".to_string()),
            total_space: 64 * 1024 * 1024 * 1024,
            available_space: 32 * 1024 * 1024 * 1024,
            is_removable: false,
        }],
    }
}

/// Bundle with every section requested, no config and no system info.
pub fn sample_bundle(logs: Vec<LogEntry>) -> Bundle {
    Bundle {
        id: "5f0c6a3e-2b1d-4c8e-9a7f-0123456789ab".to_string(),
        created_at: Utc::now(),
        collector_version: env!("CARGO_PKG_VERSION").to_string(),
        system_id: "0123456789ab".to_string(),
        options: CollectorOptions::default(),
        logs,
        config: None,
        system_info: None,
        diagnostics: CollectionDiagnostics::default(),
    }
}
