//! The `pixprep convert` command for converting a dataset.

mod summary;
pub mod types;

pub use types::StatsFormat;

use clap::Args;
use pixprep_core::{Config, Converter, FsSink};
use std::path::PathBuf;
use std::time::Instant;

use summary::{create_progress_bar, format_stats, print_summary};

/// Arguments for the `convert` command.
///
/// Every option falls back to the `[convert]` config section, so a bare
/// `pixprep convert` runs the configured job.
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Directory of source images (defaults to convert.input_dir)
    pub input: Option<PathBuf>,

    /// Directory for converted images (defaults to convert.output_dir)
    pub output: Option<PathBuf>,

    /// Target width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// How statistics are printed to stdout
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: StatsFormat,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ConvertArgs {
    /// Fold command-line overrides into the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.convert.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.convert.output_dir = output.clone();
        }
        if let Some(width) = self.width {
            config.convert.width = width;
        }
        if let Some(height) = self.height {
            config.convert.height = height;
        }
        if let Some(quality) = self.quality {
            config.convert.quality = quality;
        }
    }
}

/// Execute the convert command.
pub fn execute(args: ConvertArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let input_dir = config.input_dir();
    let output_dir = config.output_dir();
    let converter = Converter::new(&config);

    tracing::info!(
        "Converting {:?} -> {:?} at {}x{}",
        input_dir,
        output_dir,
        config.convert.width,
        config.convert.height
    );

    let total = converter.discover(&input_dir)?.len() as u64;
    let progress = if args.no_progress {
        indicatif::ProgressBar::hidden()
    } else {
        create_progress_bar(total)
    };

    let start = Instant::now();
    let mut sink = FsSink::new(&output_dir);
    let mut failed = 0usize;
    let result = converter.run_with_progress(&input_dir, &mut sink, |p| {
        if p.failed {
            failed += 1;
        }
        progress.set_position(p.completed as u64);
        progress.set_message(format!("{} failed", failed));
    });
    progress.finish_and_clear();
    let report = result?;

    print_summary(&report, converter.size(), start.elapsed());

    let stats = report.dataset_stats()?;
    match args.format {
        StatsFormat::Text => println!("{}", format_stats(&stats)),
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
