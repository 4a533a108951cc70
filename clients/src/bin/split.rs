//! `kg-split`: reconciles encoded dataset splits with their raw N-Triples.
//!
//! For every configured dataset, reads the raw store and the encoded
//! train/val/test edge tables, keeps only edges grounded in the raw store,
//! and writes triple files plus entity/relation/type tables to
//! `<data>/<DATASET>/triple_split/`.
//!
//! **Usage:**
//! ```
//! kg-split [--config <reconcile.toml>] [--data <dir>] [--dataset <NAME>]...
//!          [--relation-order sorted|first-seen] [--collisions last-write-wins|reject]
//! ```
//!
//! Exits non-zero if any dataset fails. Remaining datasets are still processed.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use kg_reconcile::{
    process_dataset, CollisionPolicy, DatasetReport, RelationOrder, Settings, Severity,
};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "reconcile.toml";

/// Reconcile knowledge-graph splits with their raw N-Triples source.
#[derive(Parser)]
#[command(
    name = "kg-split",
    about = "Reconcile encoded dataset splits with their raw N-Triples store"
)]
struct Args {
    /// Settings file (default: reconcile.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding one sub-directory per dataset.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Dataset to process; repeat for several (default: AIFB, AM, MUTAG).
    #[arg(long = "dataset", value_name = "NAME")]
    datasets: Vec<String>,

    /// Relation ID order: sorted or first-seen.
    #[arg(long)]
    relation_order: Option<RelationOrder>,

    /// Predicate collision policy: last-write-wins or reject.
    #[arg(long)]
    collisions: Option<CollisionPolicy>,
}

impl Args {
    /// Loads the config file, then applies command-line overrides.
    fn settings(self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None if Path::new(DEFAULT_CONFIG).is_file() => {
                Settings::load(Path::new(DEFAULT_CONFIG))
                    .with_context(|| format!("Failed to load settings from {DEFAULT_CONFIG}"))?
            }
            None => Settings::default(),
        };
        if let Some(data) = self.data {
            settings.data_root = data;
        }
        if !self.datasets.is_empty() {
            settings.datasets = self.datasets;
        }
        if let Some(order) = self.relation_order {
            settings.relation_order = order;
        }
        if let Some(policy) = self.collisions {
            settings.collisions = policy;
        }
        Ok(settings)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let settings = Args::parse().settings()?;

    println!("Knowledge-Graph Split Reconciliation");
    println!("====================================");

    let mut succeeded = 0usize;
    let mut failed = Vec::new();
    for dataset in &settings.datasets {
        match process_dataset(&settings.layout(dataset), &settings) {
            Ok(report) => {
                print_report(&report);
                succeeded += 1;
            }
            Err(e) => {
                tracing::error!(dataset = %e.dataset, error = %e.source, "dataset failed");
                failed.push(e);
            }
        }
    }

    println!();
    println!(
        "Summary: {} datasets reconciled, {} failed",
        succeeded,
        failed.len()
    );

    if !failed.is_empty() {
        for e in &failed {
            eprintln!("FAILED: {}", e);
        }
        process::exit(1);
    }
    Ok(())
}

fn print_report(report: &DatasetReport) {
    println!();
    println!("[{}]", report.dataset);
    for finding in &report.findings {
        let status = match finding.severity {
            Severity::Info => "INFO",
            Severity::Warning => "WARN",
        };
        println!("[{}] {} — {}", status, finding.component, finding.message);
        for detail in &finding.details {
            println!("       {}", detail);
        }
    }
    if report.is_clean() {
        println!("{}: reconciled cleanly.", report.dataset);
    } else {
        println!(
            "{}: reconciled with {} warning(s).",
            report.dataset,
            report.warning_count()
        );
    }
}
