use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod core;
mod dereplication;
mod parsing;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("derep=debug,info")
    } else {
        EnvFilter::new("derep=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Dereplicate(args) => {
            cli::dereplicate::run(args, cli.verbose)?;
        }
        cli::Commands::Sort(args) => {
            cli::sort::run(args, cli.verbose)?;
        }
    }

    Ok(())
}
