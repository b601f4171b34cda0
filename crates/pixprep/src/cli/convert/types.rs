//! CLI enum types for the convert command.

use clap::ValueEnum;

/// How dataset statistics are printed to stdout.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum StatsFormat {
    /// Human-readable mean and std lines
    #[default]
    Text,
    /// The full conversion report as one JSON object
    Json,
}

impl std::fmt::Display for StatsFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}
