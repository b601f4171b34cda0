//! pixprep Core - dataset preparation for image model training.
//!
//! pixprep converts a directory of (possibly transparent) PNG images into
//! fixed-size RGB JPEGs and measures the per-channel statistics needed to
//! normalize them as model inputs. It also renders loss curves and sample
//! grids for inspecting a training run.
//!
//! # Architecture
//!
//! ```text
//! Discover → Validate → Decode → Flatten alpha → Resize → JPEG → Sink
//!                                                      ↘ Statistics
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! fn main() -> pixprep_core::Result<()> {
//!     let stats = pixprep_core::convert_images_to_jpg("./sprites", "./data/128", (128, 128))?;
//!     println!("mean {:?} std {:?}", stats.mean, stats.std);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod types;

use std::path::Path;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, PipelineError, PipelineResult, PixprepError, ReportError, ReportResult, Result,
};
pub use pipeline::{ConvertProgress, Converter};
pub use report::{GridExporter, LossPlotter};
pub use sink::{FsSink, MemorySink, OutputSink};
pub use types::{ConversionReport, DatasetStats, FailedImage, LossSeries, PerImageStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert every PNG in `input_dir` to a `size` JPEG in `output_dir` and
/// return the dataset statistics.
///
/// Uses default limits and quality 100. Undecodable files are skipped and
/// logged; an input with no convertible image fails with
/// [`PipelineError::EmptyDataset`].
pub fn convert_images_to_jpg(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    size: (u32, u32),
) -> Result<DatasetStats> {
    let mut config = Config::default();
    config.convert.width = size.0;
    config.convert.height = size.1;
    config.validate()?;

    let mut sink = FsSink::new(output_dir.as_ref());
    let report = Converter::new(&config).run(input_dir.as_ref(), &mut sink)?;
    Ok(report.dataset_stats()?)
}
