//! Command-line demo of the record contracts.
//!
//! Builds a backend from a TOML config (or flags), wires the consumers it
//! supports, then enrolls, removes and lists records through them.
//!
//! ```text
//! record-demo --remove 2 --remove 2
//! record-demo --backend fixed --remove 0      # capability violation
//! record-demo --config store.toml --json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use record_contract::{BackendKind, Contract, StoreConfig, Wiring};
use tracing_subscriber::EnvFilter;

/// Records loaded when no config file is given.
const DEFAULT_RECORDS: [&str; 4] = ["Jane", "John", "Goku", "Vegeta"];

#[derive(Parser, Debug)]
#[command(name = "record-demo", about = "Drive a record backend through its contracts")]
struct Cli {
    /// TOML file selecting the backend and its records
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured backend (memory, indexed, fixed)
    #[arg(short, long)]
    backend: Option<BackendKind>,

    /// Per-call deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Names to enroll before removing
    #[arg(short, long = "enroll", value_name = "NAME")]
    enroll: Vec<String>,

    /// Record ids to remove, in order
    #[arg(short, long = "remove", value_name = "ID")]
    remove: Vec<String>,

    /// Print the final listing and capabilities as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("record_contract=debug")
    } else {
        EnvFilter::new("record_contract=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StoreConfig::default().with_records(DEFAULT_RECORDS),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }

    let wiring = Wiring::from_config(&config).context("wiring backend")?;
    let caps = wiring.capabilities();

    if !cli.json {
        println!("Backend:   {}", caps.name);
        println!(
            "Contracts: {}",
            wiring
                .contracts()
                .iter()
                .map(Contract::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
    }

    if !cli.enroll.is_empty() {
        let enrollment = wiring.enrollment()?;
        for name in &cli.enroll {
            let id = enrollment.enroll(name).await?;
            if !cli.json {
                println!("Enrolled {name} as #{id}");
            }
        }
    }

    if !cli.remove.is_empty() {
        let directory = wiring.directory()?;
        for raw in &cli.remove {
            match directory.remove_raw(raw).await {
                Ok(record) if !cli.json => println!("Removed {record}"),
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    if !cli.json {
                        println!("Not found: {raw}");
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    let records = wiring.catalog().list().await?;

    if cli.json {
        let report = serde_json::json!({
            "capabilities": caps,
            "contracts": wiring.contracts(),
            "records": records,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if !cli.enroll.is_empty() || !cli.remove.is_empty() {
        println!();
    }
    println!("Records:");
    for record in &records {
        println!("  {record}");
    }

    Ok(())
}
