use clap::Args;

use crate::cli::{execute, FilterArgs, IoArgs};
use crate::dereplication::pipeline::DerepConfig;

#[derive(Args, Debug)]
pub struct SortArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Execute sort subcommand: every record is kept, relabelled as
/// `{name};size={size}`, filtered, and ordered by abundance.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the output cannot be
/// written, or the filter bounds are invalid.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SortArgs, verbose: bool) -> anyhow::Result<()> {
    let config = DerepConfig {
        filter: args.filter.to_filter()?,
        sort: true,
        merge: false,
    };

    let summary = execute(&args.io, config)?;

    if verbose {
        eprintln!(
            "Sorted {} records ({} written, {} filtered)",
            summary.records_read, summary.clusters_written, summary.clusters_filtered
        );
    }

    Ok(())
}
