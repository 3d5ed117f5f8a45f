use serde::{Deserialize, Serialize};

/// Host facts included in a bundle.
///
/// The host name is deliberately absent; bundles identify a machine only
/// through the hashed `system_id` in their metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub kernel_version: Option<String>,
    pub architecture: String,
    pub uptime_secs: u64,
    pub cpu_info: CpuInfo,
    pub memory: MemoryInfo,
    pub disks: Vec<DiskInfo>,
}

/// CPU information data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub count: usize,
    pub brand: Option<String>,
    pub frequency: u64,
}

/// Memory figures in bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_memory: u64,
    pub used_memory: u64,
    pub total_swap: u64,
    pub used_swap: u64,
}

/// Disk information data structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub mount_point: String,
    pub file_system: Option<String>,
    pub total_space: u64,
    pub available_space: u64,
    pub is_removable: bool,
}
