use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::SupportSettings;
use crate::models::CollectorOptions;

/// Command-line arguments for the support bundle tool.
///
/// Values given here override the settings file, which in turn overrides
/// the built-in defaults.
#[derive(Parser, Debug)]
#[clap(name = "support-bundle", about = "Collect a scrubbed support bundle", version)]
pub struct Args {
    /// Settings YAML file (see `init-settings`)
    #[clap(short, long)]
    pub settings: Option<PathBuf>,

    /// Directory the archive is written to
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Application configuration directory
    #[clap(long)]
    pub config_dir: Option<String>,

    /// Application data directory
    #[clap(long)]
    pub data_dir: Option<String>,

    /// Skip log collection
    #[clap(long)]
    pub no_logs: bool,

    /// Skip configuration collection
    #[clap(long)]
    pub no_config: bool,

    /// Skip system information collection
    #[clap(long)]
    pub no_system: bool,

    /// Collect logs modified within this many hours
    #[clap(long)]
    pub duration_hours: Option<u64>,

    /// Byte budget for collected log files, in MiB
    #[clap(long)]
    pub max_log_size_mb: Option<u64>,

    /// Verbose logging; also includes debug-priority journal records
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default settings file
    InitSettings {
        /// Path to output settings file
        #[clap(default_value = "support.yaml")]
        path: PathBuf,

        /// Application the settings are for
        #[clap(long)]
        app_name: Option<String>,
    },
}

impl Args {
    /// Apply directory overrides to loaded settings.
    pub fn apply_to_settings(&self, settings: &mut SupportSettings) {
        if let Some(dir) = &self.config_dir {
            settings.config_dir = dir.clone();
        }
        if let Some(dir) = &self.data_dir {
            settings.data_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.to_string_lossy().to_string();
        }
    }

    /// Options for this run: settings defaults with flag overrides.
    pub fn collector_options(&self, settings: &SupportSettings) -> CollectorOptions {
        let mut options = settings.collector_options();
        options.include_logs &= !self.no_logs;
        options.include_config &= !self.no_config;
        options.include_system_info &= !self.no_system;
        if let Some(hours) = self.duration_hours {
            options.log_duration = Duration::from_secs(hours.saturating_mul(3600));
        }
        if let Some(mb) = self.max_log_size_mb {
            options.max_log_size = mb.saturating_mul(1024 * 1024);
        }
        options.verbose = self.verbose;
        options
    }
}
