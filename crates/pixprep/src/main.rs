//! pixprep CLI - prepare image datasets for model training.
//!
//! pixprep flattens a directory of transparent PNGs onto white, resizes them
//! to a fixed size, writes them as JPEGs, and prints the per-channel mean and
//! standard deviation needed to normalize them as model inputs.
//!
//! # Usage
//!
//! ```bash
//! # Run the configured conversion job
//! pixprep convert
//!
//! # Convert a specific directory at 128x128 and print JSON statistics
//! pixprep convert ./sprites ./data/128 --width 128 --height 128 --format json
//!
//! # Plot loss curves recorded by a training run
//! pixprep plot losses.json
//!
//! # View configuration
//! pixprep config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// pixprep - Dataset preparation and training introspection for image models.
#[derive(Parser, Debug)]
#[command(name = "pixprep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert source images to fixed-size JPEGs and compute dataset statistics
    Convert(cli::convert::ConvertArgs),

    /// Render loss curves from a JSON file of per-epoch values
    Plot(cli::plot::PlotArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match pixprep_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `pixprep config path`."
            );
            pixprep_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("pixprep v{}", pixprep_core::VERSION);

    match cli.command {
        Commands::Convert(args) => cli::convert::execute(args, config),
        Commands::Plot(args) => cli::plot::execute(args, &config),
        Commands::Config(args) => cli::config::execute(args, &config),
    }
}
