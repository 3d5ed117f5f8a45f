use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::collectors::diagnostics::{
    CollectionDiagnostics, DiagnosticInfo, LogCollectionDiagnostics, LogSourceDiagnostics,
};
use crate::collectors::file_logs::FileLogCollector;
use crate::collectors::journal::JournalCollector;
use crate::collectors::paths::LogPathResolver;
use crate::collectors::sources::{ConfigSource, YamlConfigSource};
use crate::collectors::system::{SysinfoSource, SystemInfo, SystemInfoSource};
use crate::config::SupportSettings;
use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_APP_NAME, DEFAULT_JOURNAL_COMMAND, DEFAULT_JOURNAL_TIMEOUT_SECS,
    SYSTEM_ID_HASH_LEN,
};
use crate::error::{ArchiveError, Result};
use crate::models::{Bundle, CollectorOptions, LogEntry};
use crate::security::{safe_error_message, ConfigScrubber};
use crate::utils::archive::create_archive;
use crate::utils::hash::short_digest;

/// Builds support bundles for one application.
///
/// Everything held here is read-only after construction, so one collector
/// can serve concurrent [`Collector::collect`] calls. All per-run state
/// (size counters, entries, diagnostics) is created inside each call.
pub struct Collector {
    config_path: PathBuf,
    data_path: PathBuf,
    app_name: String,
    scrubber: ConfigScrubber,
    journal: JournalCollector,
    config_source: Arc<dyn ConfigSource>,
    system_source: Arc<dyn SystemInfoSource>,
}

impl Collector {
    /// Collector with default collaborators: `config.yaml` from the config
    /// directory, host facts from sysinfo, and `journalctl` for the
    /// `<app>.service` unit.
    pub fn new(config_path: &Path, data_path: &Path) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            data_path: data_path.to_path_buf(),
            app_name: DEFAULT_APP_NAME.to_string(),
            scrubber: ConfigScrubber::default(),
            journal: JournalCollector::new(
                DEFAULT_JOURNAL_COMMAND,
                &format!("{}.service", DEFAULT_APP_NAME),
                std::time::Duration::from_secs(DEFAULT_JOURNAL_TIMEOUT_SECS),
            ),
            config_source: Arc::new(YamlConfigSource::new(config_path.join(CONFIG_FILE_NAME))),
            system_source: Arc::new(SysinfoSource::new()),
        }
    }

    /// Collector configured from a settings file.
    pub fn from_settings(settings: &SupportSettings) -> Self {
        let config_path = settings.config_path();
        let data_path = settings.data_path();

        Self::new(&config_path, &data_path)
            .with_app_name(&settings.app_name)
            .with_sensitive_keys(settings.sensitive_keys.iter().cloned())
            .with_journal(JournalCollector::new(
                &settings.journal_command,
                &settings.service_name(),
                settings.journal_timeout(),
            ))
            .with_config_source(Arc::new(YamlConfigSource::new(settings.config_file())))
    }

    /// Application name used for platform log directories.
    pub fn with_app_name(mut self, app_name: &str) -> Self {
        self.app_name = app_name.to_string();
        self
    }

    pub fn with_sensitive_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scrubber = ConfigScrubber::new(keys);
        self
    }

    pub fn with_journal(mut self, journal: JournalCollector) -> Self {
        self.journal = journal;
        self
    }

    pub fn with_config_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.config_source = source;
        self
    }

    pub fn with_system_info_source(mut self, source: Arc<dyn SystemInfoSource>) -> Self {
        self.system_source = source;
        self
    }

    /// Deduplicated absolute log directories, in search order.
    pub fn log_paths(&self) -> Vec<PathBuf> {
        LogPathResolver::new(&self.config_path, &self.data_path, &self.app_name).unique_log_paths()
    }

    /// Run one collection.
    ///
    /// Fails only when `options` request nothing. Every per-source failure
    /// ends up in the bundle's diagnostics instead.
    pub async fn collect(&self, cancel: &CancellationToken, options: &CollectorOptions) -> Result<Bundle> {
        options.validate()?;

        let created_at = Utc::now();
        let id = Uuid::new_v4().to_string();
        info!("Starting support bundle collection {}", id);

        let mut diagnostics = CollectionDiagnostics::default();
        let (logs, config, system_info) = tokio::join!(
            self.collect_logs(cancel, options, created_at, &mut diagnostics.log_collection),
            self.collect_config(options, &mut diagnostics.config_collection),
            self.collect_system_info(options, &mut diagnostics.system_collection),
        );

        info!(
            "Collection {} finished: {} log entries, config: {}, system info: {}",
            id,
            logs.len(),
            config.is_some(),
            system_info.is_some()
        );

        Ok(Bundle {
            id,
            created_at,
            collector_version: env!("CARGO_PKG_VERSION").to_string(),
            system_id: system_id(),
            options: options.clone(),
            logs,
            config,
            system_info,
            diagnostics,
        })
    }

    /// Run one collection and write it as an archive into `output_dir`.
    pub async fn collect_archive(
        &self,
        cancel: &CancellationToken,
        options: &CollectorOptions,
        output_dir: &Path,
    ) -> Result<(Bundle, PathBuf)> {
        let bundle = self.collect(cancel, options).await?;

        let output_dir = output_dir.to_path_buf();
        let (bundle, written) = tokio::task::spawn_blocking(move || {
            let written = create_archive(&bundle, &output_dir);
            (bundle, written)
        })
        .await
        .map_err(|e| ArchiveError::Io(io::Error::new(io::ErrorKind::Other, e)))?;

        Ok((bundle, written?))
    }

    async fn collect_logs(
        &self,
        cancel: &CancellationToken,
        options: &CollectorOptions,
        now: DateTime<Utc>,
        diagnostics: &mut LogCollectionDiagnostics,
    ) -> Vec<LogEntry> {
        if !options.include_logs {
            return Vec::new();
        }

        let paths = self.log_paths();
        debug!("Searching {} log directories", paths.len());

        let mut file_collector = FileLogCollector::new(now, options.log_duration, options.max_log_size);
        let since = file_collector.cutoff_time();

        let file_task = tokio::task::spawn_blocking(move || {
            let mut file_diagnostics = LogSourceDiagnostics::default();
            let entries = file_collector.collect(&paths, &mut file_diagnostics);
            (entries, file_diagnostics)
        });
        // journal output is held in memory, so it gets the same byte cap
        let journal = self.journal.clone().with_max_output(options.max_log_size);
        let journal_task = journal.collect(since, options.verbose, cancel, &mut diagnostics.journal_logs);

        let (file_result, journal_result) = tokio::join!(file_task, journal_task);

        let mut entries = match file_result {
            Ok((entries, file_diagnostics)) => {
                diagnostics.file_logs = file_diagnostics;
                entries
            }
            Err(e) => {
                warn!("{}", safe_error_message("File log collection task failed", &e));
                diagnostics.file_logs.begin();
                diagnostics
                    .file_logs
                    .record_failure(safe_error_message("file log collection task failed", &e));
                Vec::new()
            }
        };
        if let Ok(mut journal_entries) = journal_result {
            entries.append(&mut journal_entries);
        }

        diagnostics.summarize(since, now);
        entries
    }

    async fn collect_config(&self, options: &CollectorOptions, diagnostics: &mut DiagnosticInfo) -> Option<Value> {
        if !options.include_config {
            return None;
        }
        diagnostics.begin();

        match self.config_source.load().await {
            Ok(raw) => {
                let scrubbed = self.scrubber.scrub(&raw);
                diagnostics.record_success();
                Some(scrubbed)
            }
            Err(e) => {
                let message = safe_error_message("failed to load configuration", &format!("{:#}", e));
                warn!("{}", message);
                diagnostics.record_failure(message);
                None
            }
        }
    }

    async fn collect_system_info(
        &self,
        options: &CollectorOptions,
        diagnostics: &mut DiagnosticInfo,
    ) -> Option<SystemInfo> {
        if !options.include_system_info {
            return None;
        }
        diagnostics.begin();

        match self.system_source.system_info().await {
            Ok(info) => {
                diagnostics.record_success();
                Some(info)
            }
            Err(e) => {
                let message =
                    safe_error_message("failed to collect system information", &format!("{:#}", e));
                warn!("{}", message);
                diagnostics.record_failure(message);
                None
            }
        }
    }
}

/// Stable, non-reversible identifier of this host.
fn system_id() -> String {
    match hostname::get() {
        Ok(name) => short_digest(&name.to_string_lossy(), SYSTEM_ID_HASH_LEN),
        Err(e) => {
            debug!("Could not read host name: {}", e);
            "unknown".to_string()
        }
    }
}
