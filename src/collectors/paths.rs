//! Candidate log directory resolution.

use std::collections::HashSet;
use std::env;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::constants::LOG_DIR_NAME;

/// Builds the ordered set of directories searched for log files.
#[derive(Debug, Clone)]
pub struct LogPathResolver {
    config_path: PathBuf,
    data_path: PathBuf,
    app_name: String,
}

impl LogPathResolver {
    pub fn new(config_path: &Path, data_path: &Path, app_name: &str) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            data_path: data_path.to_path_buf(),
            app_name: app_name.to_string(),
        }
    }

    /// Candidate directories in priority order, unresolved.
    pub fn log_search_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(LOG_DIR_NAME),
            self.data_path.join(LOG_DIR_NAME),
            self.config_path.join(LOG_DIR_NAME),
        ];
        paths.extend(self.platform_log_paths());
        paths
    }

    /// Candidates resolved to absolute form, first occurrence kept.
    pub fn unique_log_paths(&self) -> Vec<PathBuf> {
        let cwd = env::current_dir().unwrap_or_default();
        unique_absolute_paths(&self.log_search_paths(), &cwd)
    }

    #[cfg(target_os = "linux")]
    fn platform_log_paths(&self) -> Vec<PathBuf> {
        vec![PathBuf::from("/var/log").join(&self.app_name)]
    }

    #[cfg(target_os = "macos")]
    fn platform_log_paths(&self) -> Vec<PathBuf> {
        env::var_os("HOME")
            .map(|home| vec![PathBuf::from(home).join("Library/Logs").join(&self.app_name)])
            .unwrap_or_default()
    }

    #[cfg(target_os = "windows")]
    fn platform_log_paths(&self) -> Vec<PathBuf> {
        env::var_os("LOCALAPPDATA")
            .map(|base| vec![PathBuf::from(base).join(&self.app_name).join(LOG_DIR_NAME)])
            .unwrap_or_default()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    fn platform_log_paths(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Resolve every path against `cwd` and drop later duplicates.
pub fn unique_absolute_paths(paths: &[PathBuf], cwd: &Path) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(paths.len());

    for path in paths {
        let resolved = resolve_absolute(path, cwd);
        if seen.insert(resolved.clone()) {
            unique.push(resolved);
        } else {
            debug!("Skipping duplicate log path {} ({})", path.display(), resolved.display());
        }
    }

    unique
}

/// Absolute form of `path`: canonical when it exists, lexically
/// normalised otherwise.
pub fn resolve_absolute(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    joined
        .canonicalize()
        .unwrap_or_else(|_| normalize_lexically(&joined))
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
