//! Main entry point for the bddtool CLI application.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use bddtool::cli::Command;
use bddtool::{BddEntry, BddExtractor, BddPacker, Cli};

/// Application entry point.
///
/// Work is strictly sequential, so a current-thread runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    match &cli.command {
        Command::Unpack { input, output_dir } => unpack(input, output_dir).await,
        Command::Pack { output, files } => pack(output, files).await,
        Command::List { input, long } => list(input, *long).await,
    }
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`/`-q`.
fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path: {}", path.display()))
}

async fn unpack(input: &Path, output_dir: &Path) -> Result<()> {
    let input = absolute(input)?;
    let output_dir = absolute(output_dir)?;

    let extractor = BddExtractor::open(&input).await?;
    extractor
        .unpack_to(&output_dir)
        .await
        .with_context(|| format!("Failed to unpack {}", input.display()))?;

    Ok(())
}

async fn pack(output: &Path, files: &[PathBuf]) -> Result<()> {
    let output = absolute(output)?;

    let mut packer = BddPacker::new();
    for file in files {
        packer.add_file(absolute(file)?);
    }

    packer
        .write(&output)
        .await
        .with_context(|| format!("Failed to pack {}", output.display()))?;

    Ok(())
}

/// List files in the archive.
///
/// Supports two output formats:
/// - Simple format: just file names, one per line
/// - Long format (`-l`): length, offset, modification time and name
async fn list(input: &Path, long: bool) -> Result<()> {
    let extractor = BddExtractor::open(&absolute(input)?).await?;
    let entries = extractor.list_files()?;

    if !long {
        for entry in &entries {
            println!("{}", entry.file_name());
        }
        return Ok(());
    }

    println!(
        "{:>10}  {:>10}  {:>16}  Name",
        "Length", "Offset", "Modified (UTC)"
    );
    println!("{}", "-".repeat(60));

    let mut total = 0u64;
    for entry in &entries {
        println!(
            "{:>10}  {:>10}  {:>16}  {}",
            entry.length,
            entry.offset,
            format_time(entry),
            entry.file_name()
        );
        total += entry.length.max(0) as u64;
    }

    println!("{}", "-".repeat(60));
    println!("{:>10}  {:>30}  {} files", total, "", entries.len());

    Ok(())
}

fn format_time(entry: &BddEntry) -> String {
    match entry.modified() {
        Ok(time) => DateTime::<Utc>::from(time).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => "-".to_string(),
    }
}
