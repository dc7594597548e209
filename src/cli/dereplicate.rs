use clap::Args;

use crate::cli::{execute, FilterArgs, IoArgs};
use crate::dereplication::pipeline::DerepConfig;

#[derive(Args, Debug)]
pub struct DereplicateArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Emit clusters in first-seen order instead of by abundance
    #[arg(long)]
    pub unsorted: bool,
}

/// Execute dereplicate subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be read, the output cannot be
/// written, or the filter bounds are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DereplicateArgs, verbose: bool) -> anyhow::Result<()> {
    let config = DerepConfig {
        filter: args.filter.to_filter()?,
        sort: !args.unsorted,
        merge: true,
    };

    let summary = execute(&args.io, config)?;

    if verbose {
        eprintln!(
            "Dereplicated {} records into {} clusters ({} written, {} filtered)",
            summary.records_read,
            summary.clusters,
            summary.clusters_written,
            summary.clusters_filtered
        );
    }

    Ok(())
}
