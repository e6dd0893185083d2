use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::cli::output::{format_check_report, format_migrate_summary};
use crate::migrate::{inspect_dashboard, migrate_dashboard, MigrationReport};

#[derive(Parser)]
#[command(name = "annomig")]
#[command(about = "Annotation Migrator - migrate dashboard annotation queries to the current nested-target shape")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migrate a dashboard's annotation entries and write the result
    Migrate {
        /// Path to the persisted dashboard JSON document
        file: PathBuf,
        /// Write the migrated document here instead of back to FILE
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the migrated document to stdout without writing any file
        #[arg(long)]
        dry_run: bool,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },
    /// Report annotation entries that still use a legacy shape
    Check {
        /// Path to the persisted dashboard JSON document
        file: PathBuf,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Migrate { file, output, dry_run, compact } => {
            handle_migrate(file, output, dry_run, compact)
        }
        Commands::Check { file, json } => handle_check(file, json),
    }
}

fn load_document(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

fn render_document(doc: &Value, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(doc)
    } else {
        serde_json::to_string_pretty(doc)
    };
    rendered.context("Failed to serialize dashboard document")
}

fn handle_migrate(
    file: PathBuf,
    output: Option<PathBuf>,
    dry_run: bool,
    compact: bool,
) -> Result<()> {
    let mut doc = load_document(&file)?;
    let report = migrate_dashboard(&mut doc)
        .with_context(|| format!("{} is not a dashboard document", file.display()))?;
    let rendered = render_document(&doc, compact)?;

    if dry_run {
        println!("{}", rendered);
        return Ok(());
    }

    let dest = output.unwrap_or_else(|| file.clone());
    fs::write(&dest, format!("{}\n", rendered))
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    log::info!("wrote migrated dashboard to {}", dest.display());

    println!("{}", format_migrate_summary(&report, &dest));
    Ok(())
}

fn handle_check(file: PathBuf, as_json: bool) -> Result<()> {
    let doc = load_document(&file)?;
    let statuses = inspect_dashboard(&doc)
        .with_context(|| format!("{} is not a dashboard document", file.display()))?;
    let report = MigrationReport::from_statuses(&statuses);

    if as_json {
        let entries: Vec<Value> = statuses
            .iter()
            .map(|s| json!({ "index": s.index, "name": s.name, "shape": s.shape.as_str() }))
            .collect();
        let summary = json!({
            "entries": entries,
            "total": report.total,
            "pending": report.migrated,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_check_report(&statuses, &report));
    }

    // Lint-style exit code: 1 when any entry still needs migration
    if report.changed() {
        std::process::exit(1);
    }
    Ok(())
}
