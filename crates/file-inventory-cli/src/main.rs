mod commands;
mod logging;
mod progress;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use file_inventory_core::storage::{Database, RecordFilter};
use file_inventory_core::{AppConfig, ScanEngine};
use progress::CliReporter;
use tracing::error;

fn main() {
    dotenv().ok();

    // Before config and logging, so `--help` works whatever the environment.
    let args = Cli::parse();

    let guard = logging::init_logger();

    let config = match file_inventory_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            drop(guard);
            process::exit(1);
        }
    };

    if let Err(err) = run(&args, config) {
        error!("Error: {:#}", err);
        drop(guard);
        process::exit(1);
    }
}

fn run(args: &Cli, config: AppConfig) -> anyhow::Result<()> {
    let mut engine = ScanEngine::new(config.clone()).refresh(args.refresh);
    if let Some(root) = &args.root {
        engine = engine.with_root(root);
    }
    if let Some(db) = &args.db {
        engine = engine.with_db_path(db);
    }

    match &args.command {
        None => run_scan(engine),
        Some(Commands::Summary) => run_summary(&open_inventory(&engine)?),
        Some(Commands::List {
            ext,
            deleted,
            limit,
            offset,
        }) => {
            let filter = RecordFilter {
                extension: ext.clone(),
                is_deleted: deleted.then_some(true),
                offset: *offset,
                limit: Some(*limit),
            };
            run_list(&open_inventory(&engine)?, &filter)
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
    }
}

fn run_scan(engine: ScanEngine) -> anyhow::Result<()> {
    let engine = engine.exclude_path(logging::log_file_path());
    let reporter = CliReporter::new();
    let result = engine.scan(&reporter).context("scan failed")?;

    println!(
        "File inventory has been {} in {}",
        if result.refresh { "refreshed" } else { "created" },
        result.db_path.display()
    );
    println!(
        "{} entries ({} files, {} directories): {} new, {} updated, {} marked deleted, {} errors in {}",
        format!("{}", result.entries_seen).cyan(),
        result.files,
        result.directories,
        format!("{}", result.inserted).green(),
        result.updated,
        format!("{}", result.marked_deleted).yellow(),
        format!("{}", result.traversal_errors + result.write_errors).red(),
        format!("{:.2}s", result.total_duration.as_secs_f64()).green(),
    );

    Ok(())
}

fn open_inventory(engine: &ScanEngine) -> anyhow::Result<Database> {
    let root = engine.resolve_root()?;
    let db_path: PathBuf = engine.resolve_db_path(&root);
    if !db_path.exists() {
        anyhow::bail!("no inventory at {}; run a scan first", db_path.display());
    }
    Database::open(&db_path).with_context(|| format!("cannot open {}", db_path.display()))
}

fn run_summary(db: &Database) -> anyhow::Result<()> {
    let summary = db.inventory_summary()?;
    println!(
        "{} records: {} live, {} deleted, {} directories, {} bytes",
        format!("{}", summary.total_records).cyan(),
        format!("{}", summary.live_records).green(),
        format!("{}", summary.deleted_records).red(),
        summary.directories,
        summary.live_bytes,
    );
    if let Some(when) = summary
        .last_scan
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    {
        println!("Last scan: {}", when.to_rfc3339());
    }
    Ok(())
}

fn run_list(db: &Database, filter: &RecordFilter) -> anyhow::Result<()> {
    for record in db.list_records(filter)? {
        let kind = if record.is_directory { "dir " } else { "file" };
        let line = format!(
            "{} {:>12} {:<6} {}",
            kind, record.size, record.attributes, record.path
        );
        if record.is_deleted {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}
