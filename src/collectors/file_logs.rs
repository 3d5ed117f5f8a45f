//! On-disk log file collection.
//!
//! Walks the resolved log directories, keeps files that look like logs
//! and were modified inside the requested window, and reads them newest
//! first until the byte budget is exhausted. Every line is scrubbed as it
//! is read.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::collectors::diagnostics::{permission_hint, LogSourceDiagnostics, SearchedPath};
use crate::collectors::log_line::scrubbed_entry;
use crate::constants::{LOG_FILE_SUFFIX, LOG_WALK_MAX_DEPTH};
use crate::models::LogEntry;
use crate::security::safe_error_message;

/// A file that passed the name and time tests.
#[derive(Debug, Clone)]
struct LogCandidate {
    path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
}

/// Result of scanning one directory.
struct DirectoryScan {
    searched: SearchedPath,
    candidates: Vec<LogCandidate>,
    too_old: usize,
    unreadable: usize,
}

/// Per-call state of a file log collection.
#[derive(Debug, Clone)]
pub struct FileLogCollector {
    cutoff_time: DateTime<Utc>,
    total_size: u64,
    max_size: u64,
    budget_exhausted: bool,
}

impl FileLogCollector {
    pub fn new(now: DateTime<Utc>, duration: Duration, max_size: u64) -> Self {
        let window = chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::max_value());
        let cutoff_time = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self {
            cutoff_time,
            total_size: 0,
            max_size,
            budget_exhausted: false,
        }
    }

    pub fn cutoff_time(&self) -> DateTime<Utc> {
        self.cutoff_time
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// A file is a log iff its lowercased base name ends with "log".
    pub fn is_log_file(path: &str) -> bool {
        Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase().ends_with(LOG_FILE_SUFFIX))
            .unwrap_or(false)
    }

    /// Only a lower bound is enforced; future timestamps are kept.
    pub fn is_within_time_range(&self, modified: DateTime<Utc>) -> bool {
        modified >= self.cutoff_time
    }

    /// Whether a file of `size` bytes still fits in the budget.
    pub fn can_add_file(&self, size: u64) -> bool {
        !self.budget_exhausted
            && self
                .total_size
                .checked_add(size)
                .map_or(false, |total| total <= self.max_size)
    }

    /// Collect scrubbed entries from `directories`, recording diagnostics.
    pub fn collect(
        &mut self,
        directories: &[PathBuf],
        diagnostics: &mut LogSourceDiagnostics,
    ) -> Vec<LogEntry> {
        diagnostics.begin();
        diagnostics.add_detail("cutoff_time", self.cutoff_time.to_rfc3339());
        diagnostics.add_detail("max_size", self.max_size);

        let mut candidates = Vec::new();
        let mut too_old = 0usize;
        let mut unreadable = 0usize;
        let mut existing_dirs = 0usize;
        let mut accessible_dirs = 0usize;

        for dir in directories {
            let scan = self.scan_directory(dir);
            if scan.searched.exists {
                existing_dirs += 1;
            }
            if scan.searched.accessible {
                accessible_dirs += 1;
            } else if let Some(err) = &scan.searched.error {
                if err.contains("permission denied") {
                    diagnostics.add_detail("hint", err.clone());
                }
            }
            too_old += scan.too_old;
            unreadable += scan.unreadable;
            candidates.extend(scan.candidates);
            diagnostics.add_searched_path(scan.searched);
        }

        // newest first, so the budget goes to the most recent logs
        candidates.sort_by(|a, b| b.modified.cmp(&a.modified));

        let mut entries = Vec::new();
        let mut source_names: HashSet<String> = HashSet::new();
        let mut skipped_budget = 0usize;

        for candidate in &candidates {
            if !self.can_add_file(candidate.size) {
                if !self.budget_exhausted {
                    info!(
                        "Log budget of {} bytes reached at {} ({} bytes)",
                        self.max_size,
                        candidate.path.display(),
                        candidate.size
                    );
                }
                self.budget_exhausted = true;
                skipped_budget += 1;
                continue;
            }

            let source = unique_source_name(&candidate.path, &mut source_names);
            match read_entries(candidate, &source) {
                Ok(mut file_entries) => {
                    debug!(
                        "Collected {} lines from {}",
                        file_entries.len(),
                        candidate.path.display()
                    );
                    self.total_size += candidate.size;
                    entries.append(&mut file_entries);
                }
                Err(e) => {
                    unreadable += 1;
                    warn!("{}", safe_error_message(&format!("Failed to read {}", candidate.path.display()), &e));
                    if let Some(hint) = permission_hint(&e) {
                        diagnostics.add_detail("hint", hint);
                    }
                }
            }
        }

        diagnostics.add_detail("total_size", self.total_size);
        diagnostics.add_detail("files_skipped_too_old", too_old);
        diagnostics.add_detail("files_skipped_budget", skipped_budget);
        diagnostics.add_detail("budget_exhausted", self.budget_exhausted);
        diagnostics.add_detail("unreadable_files", unreadable);

        if existing_dirs > 0 && accessible_dirs == 0 {
            diagnostics.record_failure("log directories exist but none could be read");
        } else {
            diagnostics.record_success(entries.len());
        }
        diagnostics.entries_found = entries.len();

        entries
    }

    fn scan_directory(&self, dir: &Path) -> DirectoryScan {
        let mut scan = DirectoryScan {
            searched: SearchedPath {
                path: dir.to_string_lossy().to_string(),
                exists: dir.exists(),
                accessible: false,
                file_count: 0,
                error: None,
            },
            candidates: Vec::new(),
            too_old: 0,
            unreadable: 0,
        };

        if !scan.searched.exists {
            return scan;
        }

        if let Err(e) = fs::read_dir(dir) {
            let message = permission_hint(&e)
                .map(|hint| hint.to_string())
                .unwrap_or_else(|| safe_error_message("failed to read directory", &e));
            warn!("Cannot read log directory {}: {}", dir.display(), e);
            scan.searched.error = Some(message);
            return scan;
        }
        scan.searched.accessible = true;

        let walker = WalkDir::new(dir)
            .max_depth(LOG_WALK_MAX_DEPTH)
            .follow_links(false);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry under {}: {}", dir.display(), e);
                    scan.unreadable += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file()
                || !Self::is_log_file(&entry.file_name().to_string_lossy())
            {
                continue;
            }
            scan.searched.file_count += 1;

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(_) => {
                    scan.unreadable += 1;
                    continue;
                }
            };
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            if !self.is_within_time_range(modified) {
                debug!("Skipping old log file {}", entry.path().display());
                scan.too_old += 1;
                continue;
            }

            scan.candidates.push(LogCandidate {
                path: entry.path().to_path_buf(),
                size: metadata.len(),
                modified,
            });
        }

        scan
    }
}

/// Read at most the admitted size and scrub every line.
fn read_entries(candidate: &LogCandidate, source: &str) -> std::io::Result<Vec<LogEntry>> {
    let mut raw = Vec::with_capacity(candidate.size as usize);
    File::open(&candidate.path)?
        .take(candidate.size)
        .read_to_end(&mut raw)?;

    let content = String::from_utf8_lossy(&raw);
    Ok(content
        .lines()
        .filter_map(|line| scrubbed_entry(source, line, candidate.modified))
        .collect())
}

/// Base file name, suffixed `_1`, `_2`, ... until no earlier source uses it.
fn unique_source_name(path: &Path, taken: &mut HashSet<String>) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed.log".to_string());

    let mut name = base.clone();
    let mut counter = 1;
    while !taken.insert(name.clone()) {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| base.clone());
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        name = format!("{}_{}{}", stem, counter, extension);
        counter += 1;
    }
    name
}
