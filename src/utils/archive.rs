//! Bundle archive assembly.
//!
//! Layout of a bundle archive:
//!
//! ```text
//! metadata.json            bundle id, creation time, version, options
//! logs/<source>            one file per collected log source
//! logs/journal.log         journal entries
//! logs/README.txt          only when log collection produced nothing
//! config/config.yaml       scrubbed configuration (or config/README.txt)
//! system/system_info.json  host facts (or system/README.txt)
//! diagnostics.json         the complete diagnostics record
//! ```
//!
//! Sections that were not requested are left out entirely.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use zip::{write::FileOptions, ZipWriter};

use crate::constants::{
    ARCHIVE_CONFIG_DIR, ARCHIVE_CONFIG_NAME, ARCHIVE_DIAGNOSTICS_NAME, ARCHIVE_JOURNAL_NAME,
    ARCHIVE_LOGS_DIR, ARCHIVE_METADATA_NAME, ARCHIVE_NAME_PREFIX, ARCHIVE_README_NAME,
    ARCHIVE_SYSTEM_DIR, ARCHIVE_SYSTEM_NAME, JOURNAL_SOURCE, NO_CONFIG_NOTE, NO_LOGS_NOTE,
    NO_SYSTEM_INFO_NOTE,
};
use crate::error::ArchiveError;
use crate::models::{Bundle, CollectorOptions, LogEntry};

/// Contents of `metadata.json`.
#[derive(Serialize)]
struct BundleMetadata<'a> {
    id: &'a str,
    created_at: DateTime<Utc>,
    collector_version: &'a str,
    system_id: &'a str,
    options: &'a CollectorOptions,
    log_entries: usize,
}

fn file_options() -> FileOptions {
    FileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644)
}

fn add_file<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    content: &[u8],
) -> Result<(), ArchiveError> {
    zip.start_file(name, file_options())?;
    zip.write_all(content)?;
    debug!("Added {} ({} bytes)", name, content.len());
    Ok(())
}

/// Write the fixed "no logs" note as `logs/README.txt`.
pub fn add_no_logs_note<W: Write + Seek>(zip: &mut ZipWriter<W>) -> Result<(), ArchiveError> {
    add_file(
        zip,
        &format!("{}/{}", ARCHIVE_LOGS_DIR, ARCHIVE_README_NAME),
        NO_LOGS_NOTE.as_bytes(),
    )
}

/// `support-<YYYYMMDD-HHMMSS>-<id prefix>.zip`
pub fn archive_file_name(bundle: &Bundle) -> String {
    let id_prefix: String = bundle.id.chars().filter(|c| *c != '-').take(8).collect();
    format!(
        "{}-{}-{}.zip",
        ARCHIVE_NAME_PREFIX,
        bundle.created_at.format("%Y%m%d-%H%M%S"),
        id_prefix
    )
}

/// Group entries by source, keeping line order within a source.
fn log_files(logs: &[LogEntry]) -> BTreeMap<String, Vec<&LogEntry>> {
    let mut files: BTreeMap<String, Vec<&LogEntry>> = BTreeMap::new();
    for entry in logs {
        files.entry(entry.source.clone()).or_default().push(entry);
    }
    files
}

/// File name for a source under `logs/`, never reusing a taken name.
fn log_entry_name(source: &str, taken: &mut HashSet<String>) -> String {
    let base = source.to_string();
    let mut name = base.clone();
    let mut counter = 1;
    while !taken.insert(name.clone()) {
        let path = Path::new(&base);
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

fn write_logs<W: Write + Seek>(zip: &mut ZipWriter<W>, logs: &[LogEntry]) -> Result<(), ArchiveError> {
    if logs.is_empty() {
        return add_no_logs_note(zip);
    }

    // the journal owns journal.log; README.txt is reserved for the note
    let mut taken: HashSet<String> = [ARCHIVE_README_NAME.to_string()].into_iter().collect();
    let files = log_files(logs);
    if files.contains_key(JOURNAL_SOURCE) {
        taken.insert(ARCHIVE_JOURNAL_NAME.to_string());
    }

    for (source, entries) in files {
        let name = if source == JOURNAL_SOURCE {
            ARCHIVE_JOURNAL_NAME.to_string()
        } else {
            log_entry_name(&source, &mut taken)
        };

        let mut content = String::new();
        for entry in entries {
            content.push_str(&entry.text);
            content.push('\n');
        }
        add_file(zip, &format!("{}/{}", ARCHIVE_LOGS_DIR, name), content.as_bytes())?;
    }
    Ok(())
}

/// Write a complete bundle into `writer` and return the finished writer.
pub fn write_bundle<W: Write + Seek>(bundle: &Bundle, writer: W) -> Result<W, ArchiveError> {
    let mut zip = ZipWriter::new(writer);

    let metadata = BundleMetadata {
        id: &bundle.id,
        created_at: bundle.created_at,
        collector_version: &bundle.collector_version,
        system_id: &bundle.system_id,
        options: &bundle.options,
        log_entries: bundle.logs.len(),
    };
    add_file(&mut zip, ARCHIVE_METADATA_NAME, &serde_json::to_vec_pretty(&metadata)?)?;

    if bundle.options.include_logs {
        write_logs(&mut zip, &bundle.logs)?;
    }

    if bundle.options.include_config {
        match &bundle.config {
            Some(config) => add_file(
                &mut zip,
                &format!("{}/{}", ARCHIVE_CONFIG_DIR, ARCHIVE_CONFIG_NAME),
                serde_yaml::to_string(config)?.as_bytes(),
            )?,
            None => add_file(
                &mut zip,
                &format!("{}/{}", ARCHIVE_CONFIG_DIR, ARCHIVE_README_NAME),
                NO_CONFIG_NOTE.as_bytes(),
            )?,
        }
    }

    if bundle.options.include_system_info {
        match &bundle.system_info {
            Some(info) => add_file(
                &mut zip,
                &format!("{}/{}", ARCHIVE_SYSTEM_DIR, ARCHIVE_SYSTEM_NAME),
                &serde_json::to_vec_pretty(info)?,
            )?,
            None => add_file(
                &mut zip,
                &format!("{}/{}", ARCHIVE_SYSTEM_DIR, ARCHIVE_README_NAME),
                NO_SYSTEM_INFO_NOTE.as_bytes(),
            )?,
        }
    }

    add_file(
        &mut zip,
        ARCHIVE_DIAGNOSTICS_NAME,
        &serde_json::to_vec_pretty(&bundle.diagnostics)?,
    )?;

    Ok(zip.finish()?)
}

/// Write `bundle` to a new archive in `output_dir`, creating the directory
/// if needed. A partially written archive is removed on failure.
pub fn create_archive(bundle: &Bundle, output_dir: &Path) -> Result<PathBuf, ArchiveError> {
    fs::create_dir_all(output_dir)?;
    let archive_path = output_dir.join(archive_file_name(bundle));

    let file = File::create(&archive_path)?;
    let written = write_bundle(bundle, file).and_then(|mut file| {
        file.flush()?;
        file.sync_all()?;
        Ok(())
    });

    if let Err(e) = written {
        warn!("Failed to write archive {}: {}", archive_path.display(), e);
        if let Err(remove_err) = fs::remove_file(&archive_path) {
            debug!("Could not remove partial archive: {}", remove_err);
        }
        return Err(e);
    }

    info!("Support bundle written to {}", archive_path.display());
    Ok(archive_path)
}
