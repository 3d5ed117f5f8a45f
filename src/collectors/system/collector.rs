use anyhow::{Context as AnyhowContext, Result};
use log::debug;
use sysinfo::{CpuExt, DiskExt, System, SystemExt};

use crate::collectors::system::models::*;

/// Supplies host facts for a bundle.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SystemInfoSource: Send + Sync {
    async fn system_info(&self) -> Result<SystemInfo>;
}

/// [`SystemInfoSource`] backed by the sysinfo crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoSource;

impl SysinfoSource {
    pub fn new() -> Self {
        Self
    }

    /// Blocking snapshot of the current host.
    pub fn snapshot() -> SystemInfo {
        let mut system = System::new();
        system.refresh_cpu();
        system.refresh_memory();
        system.refresh_disks_list();
        system.refresh_disks();

        debug!("Collecting system information");

        let cpu_info = CpuInfo {
            count: system.cpus().len(),
            brand: system
                .cpus()
                .first()
                .map(|cpu| cpu.brand().trim().to_string())
                .filter(|brand| !brand.is_empty()),
            frequency: system.cpus().first().map_or(0, |cpu| cpu.frequency()),
        };

        let memory = MemoryInfo {
            total_memory: system.total_memory(),
            used_memory: system.used_memory(),
            total_swap: system.total_swap(),
            used_swap: system.used_swap(),
        };

        let disks = system
            .disks()
            .iter()
            .map(|disk| DiskInfo {
                mount_point: disk.mount_point().to_string_lossy().to_string(),
                file_system: std::str::from_utf8(disk.file_system())
                    .ok()
                    .map(|s| s.to_string()),
                total_space: disk.total_space(),
                available_space: disk.available_space(),
                is_removable: disk.is_removable(),
            })
            .collect();

        SystemInfo {
            os_name: system.name(),
            os_version: system.os_version(),
            kernel_version: system.kernel_version(),
            architecture: std::env::consts::ARCH.to_string(),
            uptime_secs: system.uptime(),
            cpu_info,
            memory,
            disks,
        }
    }
}

#[async_trait::async_trait]
impl SystemInfoSource for SysinfoSource {
    async fn system_info(&self) -> Result<SystemInfo> {
        tokio::task::spawn_blocking(Self::snapshot)
            .await
            .context("System information task failed")
    }
}
