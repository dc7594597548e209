//! Command-line interface for derep.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **dereplicate**: Merge records with identical sequences and sum their abundance
//! - **sort**: Sort records by abundance without merging
//!
//! ## Usage
//!
//! ```text
//! # Dereplicate a FASTA file
//! derep dereplicate -i short.fasta -o merged.fasta
//!
//! # Read from a pipe, keep clusters seen at least twice
//! gunzip -c reads.fasta.gz | derep dereplicate --min 2 > merged.fasta
//!
//! # Write a JSON run summary alongside the output
//! derep dereplicate -i short.fasta -o merged.fasta.gz --report summary.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::dereplication::filter::SizeFilter;
use crate::dereplication::pipeline::{DerepConfig, Pipeline, RunSummary};
use crate::parsing::fasta;

pub mod dereplicate;
pub mod sort;

#[derive(Parser)]
#[command(name = "derep")]
#[command(version)]
#[command(about = "Dereplicate FASTA records and sum their abundance")]
#[command(
    long_about = "derep merges FASTA records with identical sequences into clusters and sums their abundance.\n\nRecord headers are semicolon-delimited lists, e.g. `>NM_000518;HBB;size=628`:\n- The first field without '=' names the sequence (default \"sequence\")\n- The last `size=N` field gives its abundance (default 1)\n\nClusters are written as `>{name};size={abundance}`, largest first."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge records with identical sequences and sum their abundance
    Dereplicate(dereplicate::DereplicateArgs),

    /// Sort records by abundance without merging
    Sort(sort::SortArgs),
}

/// Input, output, and report paths shared by every command
#[derive(Args, Debug)]
pub struct IoArgs {
    /// Input FASTA file (optionally .gz); '-' or omitted for stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output FASTA file (.gz to compress); '-' or omitted for stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

/// Abundance bounds shared by every command
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Minimal abundance of an output sequence (0 disables)
    #[arg(long, default_value = "0")]
    pub min: u64,

    /// Maximal abundance of an output sequence (0 disables)
    #[arg(long, default_value = "0")]
    pub max: u64,
}

impl FilterArgs {
    /// Build the filter, rejecting bounds that no abundance can satisfy
    ///
    /// # Errors
    ///
    /// Returns an error if both bounds are set and `min > max`.
    pub fn to_filter(&self) -> anyhow::Result<SizeFilter> {
        if self.min != SizeFilter::DISABLED && self.max != SizeFilter::DISABLED && self.min > self.max
        {
            anyhow::bail!(
                "--min ({}) must not be greater than --max ({})",
                self.min,
                self.max
            );
        }
        Ok(SizeFilter::new(self.min, self.max))
    }
}

/// Run the pipeline from `io.input` to `io.output` and write the report if asked
///
/// # Errors
///
/// Returns an error if a file cannot be opened, the run fails, or the report
/// cannot be written.
pub fn execute(io: &IoArgs, config: DerepConfig) -> anyhow::Result<RunSummary> {
    check_distinct_paths(io.input.as_deref(), io.output.as_deref())?;

    let source = fasta::open_input(io.input.as_deref())
        .with_context(|| format!("Failed to open input {}", display_path(io.input.as_deref())))?;
    let mut sink = fasta::create_output(io.output.as_deref()).with_context(|| {
        format!("Failed to create output {}", display_path(io.output.as_deref()))
    })?;

    tracing::debug!("Running with {config:?}");

    let summary = Pipeline::new(config).run(source, &mut sink)?;

    sink.into_inner().finish().with_context(|| {
        format!("Failed to close output {}", display_path(io.output.as_deref()))
    })?;

    if let Some(path) = &io.report {
        write_report(path, &summary)?;
    }

    Ok(summary)
}

/// Refuse to truncate the input by writing the output over it
fn check_distinct_paths(input: Option<&Path>, output: Option<&Path>) -> anyhow::Result<()> {
    let (Some(input), Some(output)) = (fasta::file_path(input), fasta::file_path(output)) else {
        return Ok(());
    };

    // A missing output cannot be the input; a missing input fails on open
    if let (Ok(input_abs), Ok(output_abs)) =
        (std::fs::canonicalize(input), std::fs::canonicalize(output))
    {
        if input_abs == output_abs {
            anyhow::bail!(
                "Input and output are the same file: {}",
                input.display()
            );
        }
    }

    Ok(())
}

fn write_report(path: &Path, summary: &RunSummary) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write report {}", path.display()))
}

fn display_path(path: Option<&Path>) -> String {
    path.map_or_else(|| fasta::STDIO_PATH.to_string(), |p| p.display().to_string())
}
