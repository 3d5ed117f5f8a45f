//! System journal collection via `journalctl`.
//!
//! The query runs as a child process bounded by a timeout and the caller's
//! cancellation token. A missing journal facility or service unit is
//! reported as [`JournalError::NotAvailable`], which callers treat as an
//! expected condition rather than a failure.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::collectors::diagnostics::LogSourceDiagnostics;
use crate::collectors::log_line::scrubbed_entry;
use crate::constants::{
    DEFAULT_MAX_LOG_SIZE, JOURNAL_SINCE_FORMAT, JOURNAL_SOURCE, JOURNAL_STDERR_LIMIT,
};
use crate::error::JournalError;
use crate::models::LogEntry;
use crate::security::{safe_error_message, scrub_message};

/// Queries the journal for a single service unit.
#[derive(Debug, Clone)]
pub struct JournalCollector {
    program: String,
    base_args: Vec<String>,
    service: String,
    timeout: Duration,
    max_output: u64,
}

impl JournalCollector {
    /// `command_line` may carry leading arguments, e.g. `sudo journalctl`.
    pub fn new(command_line: &str, service: &str, timeout: Duration) -> Self {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        Self {
            program,
            base_args: parts.collect(),
            service: service.to_string(),
            timeout,
            max_output: DEFAULT_MAX_LOG_SIZE,
        }
    }

    /// Cap on journal output kept per query; later lines are dropped.
    pub fn with_max_output(mut self, bytes: u64) -> Self {
        self.max_output = bytes;
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Arguments for a query covering everything since `since`.
    pub fn query_args(&self, since: DateTime<Utc>, verbose: bool) -> Vec<String> {
        let mut args = self.base_args.clone();
        args.extend([
            "-u".to_string(),
            self.service.clone(),
            "--since".to_string(),
            since.with_timezone(&Local).format(JOURNAL_SINCE_FORMAT).to_string(),
            "--no-pager".to_string(),
            "-o".to_string(),
            "short-iso".to_string(),
        ]);
        if !verbose {
            args.push("--priority=info".to_string());
        }
        args
    }

    /// Collect scrubbed journal entries newer than `since`.
    pub async fn collect(
        &self,
        since: DateTime<Utc>,
        verbose: bool,
        cancel: &CancellationToken,
        diagnostics: &mut LogSourceDiagnostics,
    ) -> Result<Vec<LogEntry>, JournalError> {
        diagnostics.begin();
        diagnostics.add_detail("service", self.service.clone());
        diagnostics.add_detail("command", self.program.clone());
        diagnostics.add_detail("since", since.to_rfc3339());
        diagnostics.add_detail("timeout_ms", self.timeout.as_millis() as u64);
        diagnostics.add_detail("max_output_bytes", self.max_output);

        let result = self.run_query(since, verbose, cancel, diagnostics).await;
        match &result {
            Ok(entries) => {
                info!("Collected {} journal entries for {}", entries.len(), self.service);
                diagnostics.add_detail("not_available", false);
                diagnostics.add_detail("lines_parsed", entries.len());
                diagnostics.record_success(entries.len());
            }
            Err(e) if e.is_not_available() => {
                info!("Journal not available: {}", e);
                diagnostics.add_detail("not_available", true);
                diagnostics.record_failure(scrub_message(&e.to_string()));
            }
            Err(e) => {
                warn!("{}", safe_error_message("Journal collection failed", e));
                diagnostics.record_failure(scrub_message(&e.to_string()));
            }
        }
        result
    }

    async fn run_query(
        &self,
        since: DateTime<Utc>,
        verbose: bool,
        cancel: &CancellationToken,
        diagnostics: &mut LogSourceDiagnostics,
    ) -> Result<Vec<LogEntry>, JournalError> {
        if cancel.is_cancelled() {
            return Err(JournalError::Cancelled);
        }
        if self.program.is_empty() {
            return Err(JournalError::NotAvailable {
                reason: "no journal command configured".to_string(),
            });
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(self.query_args(since, verbose))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running: {:?}", cmd);

        let mut child = cmd.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => JournalError::NotAvailable {
                reason: format!("{} not found", self.program),
            },
            _ => JournalError::Io(e),
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let max_output = self.max_output;
        let query = async {
            let (stdout, stderr) = tokio::try_join!(
                read_capped(stdout, max_output),
                read_capped(stderr, JOURNAL_STDERR_LIMIT),
            )?;
            if stdout.truncated {
                // the rest of the output is unwanted
                let _ = child.start_kill();
            }
            let status = child.wait().await?;
            Ok::<_, io::Error>((status, stdout, stderr))
        };

        // dropping the query future drops the child, which kills it
        let (status, stdout, stderr) = tokio::select! {
            _ = cancel.cancelled() => return Err(JournalError::Cancelled),
            waited = tokio::time::timeout(self.timeout, query) => match waited {
                Err(_) => return Err(JournalError::Timeout(self.timeout)),
                Ok(output) => output?,
            },
        };

        diagnostics.add_detail("output_truncated", stdout.truncated);
        if stdout.truncated {
            warn!(
                "Journal output for {} exceeded {} bytes, later lines dropped",
                self.service, max_output
            );
        } else {
            if let Some(code) = status.code() {
                diagnostics.add_detail("exit_code", code);
            }
            if !status.success() {
                let stderr = String::from_utf8_lossy(&stderr.bytes);
                return Err(classify_failure(status, &stderr));
            }
        }

        let collected_at = Utc::now();
        let stdout = String::from_utf8_lossy(&stdout.bytes);
        Ok(parse_journal_output(&stdout, collected_at))
    }
}

/// Output of one pipe, cut at a line boundary when over its cap.
struct CappedOutput {
    bytes: Vec<u8>,
    truncated: bool,
}

async fn read_capped<R>(reader: Option<R>, limit: u64) -> io::Result<CappedOutput>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    if let Some(reader) = reader {
        reader.take(limit.saturating_add(1)).read_to_end(&mut bytes).await?;
    }

    let truncated = bytes.len() as u64 > limit;
    if truncated {
        bytes.truncate(limit as usize);
        let keep = bytes.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
        bytes.truncate(keep);
    }
    Ok(CappedOutput { bytes, truncated })
}

/// Decide whether a failed query means "no journal here" or a real error.
pub fn classify_failure(status: ExitStatus, stderr: &str) -> JournalError {
    let lowered = stderr.to_lowercase();
    let missing_markers = [
        "could not be found",
        "not found",
        "no such file or directory",
        "no journal files were found",
    ];
    // 127: the shell could not find the command
    if status.code() == Some(127) || missing_markers.iter().any(|m| lowered.contains(m)) {
        return JournalError::NotAvailable {
            reason: scrub_message(stderr.trim()),
        };
    }
    JournalError::CommandFailed {
        status: status.to_string(),
        stderr: scrub_message(stderr.trim()),
    }
}

/// One scrubbed entry per journal line. Marker lines (`-- ... --`) are skipped.
pub fn parse_journal_output(stdout: &str, collected_at: DateTime<Utc>) -> Vec<LogEntry> {
    stdout
        .lines()
        .filter(|line| !line.starts_with("-- "))
        .filter_map(|line| scrubbed_entry(JOURNAL_SOURCE, line, collected_at))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_query_args() {
        let collector = JournalCollector::new("journalctl", "birdnet-go.service", Duration::from_secs(5));
        let since = Utc::now();
        let args = collector.query_args(since, false);

        assert_eq!(&args[..2], &["-u", "birdnet-go.service"]);
        assert_eq!(args[2], "--since");
        assert!(args.contains(&"--no-pager".to_string()));
        assert!(args.contains(&"short-iso".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--priority=info"));

        let verbose = collector.query_args(since, true);
        assert!(!verbose.iter().any(|a| a.starts_with("--priority")));
    }

    #[test]
    fn test_command_line_with_prefix() {
        let collector = JournalCollector::new("sudo journalctl", "app", Duration::from_secs(5));
        let args = collector.query_args(Utc::now(), true);
        assert_eq!(collector.program, "sudo");
        assert_eq!(args[0], "journalctl");
        assert_eq!(args[1], "-u");
    }

    #[test]
    fn test_parse_journal_output() {
        let collected_at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let stdout = "-- Logs begin at Mon 2024-01-15 09:00:00 UTC. --\n\
                      2024-01-15T10:00:00+0000 host app[42]: INFO connected to 192.168.1.10\n\
                      \n\
                      2024-01-15T10:00:05+0000 host app[42]: ERROR password=hunter2 rejected\n\
                      -- No entries --\n";
        let entries = parse_journal_output(stdout, collected_at);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.source == "journal"));
        assert_eq!(entries[0].timestamp, Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap());
        assert!(entries[0].text.contains("private-ip-"));
        assert!(!entries[0].text.contains("192.168.1.10"));
        assert_eq!(entries[1].level.as_deref(), Some("ERROR"));
        assert!(entries[1].text.contains("password: [TOKEN]"));
        assert!(!entries[1].text.contains("hunter2"));
    }

    #[cfg(unix)]
    mod process {
        use super::*;
        use std::os::unix::process::ExitStatusExt;
        use std::path::PathBuf;
        use tempfile::TempDir;

        fn script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
            let path = dir.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            path
        }

        fn collector(path: &PathBuf, timeout: Duration) -> JournalCollector {
            JournalCollector::new(&format!("/bin/sh {}", path.display()), "app.service", timeout)
        }

        #[test]
        fn test_classify_failure() {
            let unit_missing = classify_failure(
                ExitStatus::from_raw(1 << 8),
                "Unit app.service could not be found.",
            );
            assert!(unit_missing.is_not_available());

            let shell_missing = classify_failure(ExitStatus::from_raw(127 << 8), "");
            assert!(shell_missing.is_not_available());

            let failed = classify_failure(ExitStatus::from_raw(3 << 8), "Failed to open journal");
            assert!(matches!(failed, JournalError::CommandFailed { .. }));
        }

        #[tokio::test]
        async fn test_missing_command_is_not_available() {
            let collector = JournalCollector::new(
                "/nonexistent/bin/journalctl",
                "app.service",
                Duration::from_secs(5),
            );
            let mut diag = LogSourceDiagnostics::default();
            let err = collector
                .collect(Utc::now(), false, &CancellationToken::new(), &mut diag)
                .await
                .unwrap_err();

            assert!(err.is_not_available());
            assert!(diag.attempted);
            assert!(!diag.successful);
            assert!(diag.error.as_deref().unwrap_or_default().contains("journalctl"));
            assert_eq!(diag.details["not_available"], true);
        }

        #[tokio::test]
        async fn test_successful_query() {
            let dir = TempDir::new().unwrap();
            let path = script(
                &dir,
                "journal.sh",
                "echo '-- Logs begin at Mon 2024-01-15 09:00:00 UTC. --'\n\
                 echo '2024-01-15T10:00:00+0000 host app[1]: INFO user bob@example.com logged in'\n\
                 echo \"args: $*\" >&2",
            );
            let collector = collector(&path, Duration::from_secs(10));
            let mut diag = LogSourceDiagnostics::default();
            let entries = collector
                .collect(Utc::now(), false, &CancellationToken::new(), &mut diag)
                .await
                .unwrap();

            assert_eq!(entries.len(), 1);
            assert!(entries[0].text.contains("[EMAIL]"));
            assert!(diag.successful);
            assert_eq!(diag.entries_found, 1);
            assert_eq!(diag.details["exit_code"], 0);
            assert_eq!(diag.details["lines_parsed"], 1);
        }

        #[tokio::test]
        async fn test_oversized_output_is_truncated() {
            let dir = TempDir::new().unwrap();
            let path = script(
                &dir,
                "journal.sh",
                "i=0\nwhile [ $i -lt 5000 ]; do\n  echo \"2024-01-15T10:00:00+0000 host app[1]: INFO line $i\"\n  i=$((i+1))\ndone",
            );
            let collector = collector(&path, Duration::from_secs(10)).with_max_output(200);
            let mut diag = LogSourceDiagnostics::default();
            let entries = collector
                .collect(Utc::now(), false, &CancellationToken::new(), &mut diag)
                .await
                .unwrap();

            assert!(!entries.is_empty());
            assert!(entries.len() < 5);
            for (i, entry) in entries.iter().enumerate() {
                assert!(entry.text.ends_with(&format!("INFO line {}", i)), "{:?}", entry.text);
            }
            assert!(diag.successful);
            assert_eq!(diag.details["output_truncated"], true);
            assert_eq!(diag.details["max_output_bytes"], 200);
        }

        #[tokio::test]
        async fn test_unit_not_found_is_not_available() {
            let dir = TempDir::new().unwrap();
            let path = script(
                &dir,
                "journal.sh",
                "echo 'Unit app.service could not be found.' >&2\nexit 1",
            );
            let mut diag = LogSourceDiagnostics::default();
            let err = collector(&path, Duration::from_secs(10))
                .collect(Utc::now(), false, &CancellationToken::new(), &mut diag)
                .await
                .unwrap_err();
            assert!(err.is_not_available());
            assert!(diag.attempted && !diag.successful);
        }

        #[tokio::test]
        async fn test_failed_query_is_an_error() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "journal.sh", "echo 'Failed to open journal' >&2\nexit 3");
            let mut diag = LogSourceDiagnostics::default();
            let err = collector(&path, Duration::from_secs(10))
                .collect(Utc::now(), false, &CancellationToken::new(), &mut diag)
                .await
                .unwrap_err();

            assert!(!err.is_not_available());
            assert!(matches!(err, JournalError::CommandFailed { .. }));
            assert!(diag.error.is_some());
        }

        #[tokio::test]
        async fn test_query_timeout() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "journal.sh", "sleep 5");
            let mut diag = LogSourceDiagnostics::default();
            let err = collector(&path, Duration::from_millis(100))
                .collect(Utc::now(), false, &CancellationToken::new(), &mut diag)
                .await
                .unwrap_err();

            assert!(matches!(err, JournalError::Timeout(_)));
            assert!(diag.attempted && !diag.successful);
        }

        #[tokio::test]
        async fn test_query_cancelled() {
            let dir = TempDir::new().unwrap();
            let path = script(&dir, "journal.sh", "sleep 5");
            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                trigger.cancel();
            });

            let mut diag = LogSourceDiagnostics::default();
            let err = collector(&path, Duration::from_secs(10))
                .collect(Utc::now(), false, &cancel, &mut diag)
                .await
                .unwrap_err();
            assert!(matches!(err, JournalError::Cancelled));
        }

        #[tokio::test]
        async fn test_cancelled_before_start() {
            let cancel = CancellationToken::new();
            cancel.cancel();
            let collector = JournalCollector::new("journalctl", "app.service", Duration::from_secs(5));
            let mut diag = LogSourceDiagnostics::default();
            let err = collector
                .collect(Utc::now(), false, &cancel, &mut diag)
                .await
                .unwrap_err();
            assert!(matches!(err, JournalError::Cancelled));
            assert!(diag.attempted);
        }
    }
}
