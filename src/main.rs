use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use support_bundle::cli::{Args, Commands};
use support_bundle::collectors::diagnostics::CollectionDiagnostics;
use support_bundle::collectors::Collector;
use support_bundle::config::SupportSettings;
use support_bundle::constants::DEFAULT_APP_NAME;

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    // Handle subcommands
    if let Some(cmd) = &args.command {
        return handle_subcommand(cmd);
    }

    let mut settings = SupportSettings::load_or_default(args.settings.as_deref())?;
    args.apply_to_settings(&mut settings);
    let options = args.collector_options(&settings);

    info!("Collecting support bundle for {}", settings.app_name);

    let collector = Collector::from_settings(&settings);
    let output_dir = settings.output_path();
    let runtime = Runtime::new().context("Failed to create async runtime")?;

    let (bundle, archive_path) = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling collection");
                on_interrupt.cancel();
            }
        });

        collector.collect_archive(&cancel, &options, &output_dir).await
    })?;

    report_diagnostics(&bundle.diagnostics);
    info!(
        "Support bundle {} ({} log entries) written to {}",
        bundle.id,
        bundle.logs.len(),
        archive_path.display()
    );
    Ok(())
}

/// Initialize logging with appropriate level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Handle subcommands (init-settings)
fn handle_subcommand(cmd: &Commands) -> Result<()> {
    match cmd {
        Commands::InitSettings { path, app_name } => {
            let app_name = app_name.as_deref().unwrap_or(DEFAULT_APP_NAME);
            info!("Creating settings for {} at {}", app_name, path.display());
            SupportSettings::for_app(app_name).save_to_yaml_file(path)?;
            info!("Settings created successfully");
            Ok(())
        }
    }
}

/// Log a one-line outcome per source
fn report_diagnostics(diagnostics: &CollectionDiagnostics) {
    let logs = &diagnostics.log_collection;
    for (name, source) in [("file logs", &logs.file_logs), ("journal", &logs.journal_logs)] {
        if !source.attempted {
            continue;
        }
        let not_available = source.details.get("not_available") == Some(&serde_json::Value::Bool(true));
        match &source.error {
            None => info!("{}: {} entries", name, source.entries_found),
            Some(error) if not_available => info!("{}: {}", name, error),
            Some(error) => warn!("{}: {}", name, error),
        }
    }
    for (name, record) in [
        ("config", &diagnostics.config_collection),
        ("system info", &diagnostics.system_collection),
    ] {
        if let (true, Some(error)) = (record.attempted, &record.error) {
            warn!("{}: {}", name, error);
        }
    }
}
