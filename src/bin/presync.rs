//! Presync CLI Binary
//!
//! Reconciles a target directory tree against a source tree before a
//! content-mirroring pass runs between them.

use anyhow::Context;
use clap::Parser;
use presync::cli::Cli;
use presync::config::{PresyncConfig, RunConfig};
use presync::logging::{init_logging, LoggingConfig};
use presync::reconcile::{reconcile, ReconcileContext};
use presync::tree::index::TreeIndex;
use presync::tree::walker::WalkerConfig;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let file_config = match load_file_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &file_config);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, file_config) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, file_config: PresyncConfig) -> anyhow::Result<()> {
    let run_config = RunConfig::resolve(&cli.source, &cli.target, cli.dry_run, file_config.ignore)
        .context("Invalid source/target configuration")?;

    info!(
        source = %run_config.source_root.display(),
        target = %run_config.target_root.display(),
        dry_run = run_config.dry_run,
        "Presync starting"
    );

    let walker_config = WalkerConfig {
        ignore_patterns: run_config.ignore_patterns.clone(),
        ..WalkerConfig::default()
    };

    // The source index is fingerprinted eagerly: each entry may be probed by
    // many target files. The target index stays size-only; checksums are
    // computed lazily during reconciliation.
    let source_index =
        TreeIndex::build(&run_config.source_root, walker_config.clone(), true, "Source")
            .context("Failed to index source tree")?;
    let target_index = TreeIndex::build(&run_config.target_root, walker_config, false, "Target")
        .context("Failed to index target tree")?;

    let ctx = ReconcileContext {
        source_root: run_config.source_root,
        target_root: run_config.target_root,
        dry_run: run_config.dry_run,
    };
    let report = reconcile(&ctx, &source_index, &target_index)?;

    info!(
        renamed = report.renamed,
        conflicts = report.conflicts,
        "Presync finished"
    );

    Ok(())
}

/// Load the optional TOML config file; absent file flag means defaults.
fn load_file_config(cli: &Cli) -> anyhow::Result<PresyncConfig> {
    match &cli.config {
        Some(path) => PresyncConfig::load_from_file(path).context("Failed to load configuration"),
        None => Ok(PresyncConfig::default()),
    }
}

/// Build logging configuration from CLI args, environment, and config file
fn build_logging_config(cli: &Cli, file_config: &PresyncConfig) -> LoggingConfig {
    let mut config = file_config.logging.clone();

    // --debug is shorthand for --log-level debug; an explicit level wins.
    if cli.debug {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }

    config
}
