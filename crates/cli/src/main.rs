//! # bookstore CLI
//!
//! Run the bookstore simulation from the command line.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bookstore_observability::LogFormat;

#[derive(Parser)]
#[command(name = "bookstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a JSON configuration file (overrides BOOKSTORE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap a fresh store from seed data and run the simulation
    Run {
        /// Ticks to run (defaults to max_steps from the configuration)
        #[arg(long)]
        steps: Option<u64>,

        /// Random seed override
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the report for the persisted store
    Report,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Reports go to stdout; keep logs on stderr.
    bookstore_observability::tracing::init(LogFormat::Pretty);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { steps, seed } => {
            let outcome = commands::run(config, steps, seed)?;
            commands::print_report(&outcome.report, cli.json)?;
            println!("\nSimulation complete.");
            println!("Store saved to: {}", outcome.store_path.display());
        }
        Commands::Report => {
            let report = commands::report(config)?;
            commands::print_report(&report, cli.json)?;
        }
    }
    Ok(())
}
