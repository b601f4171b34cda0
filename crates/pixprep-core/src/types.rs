//! Core data types for the pixprep pipeline.
//!
//! These types represent the output of converting a dataset and the inputs
//! the report collaborators consume.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::PipelineError;

/// Number of color channels in a transformed image.
pub const CHANNELS: usize = 3;

/// Per-channel mean and standard deviation of one transformed image.
///
/// Values are computed over the [0, 1] normalized pixel representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerImageStats {
    /// Arithmetic mean per channel (R, G, B)
    pub mean: [f64; CHANNELS],

    /// Population standard deviation per channel (R, G, B)
    pub std: [f64; CHANNELS],
}

/// Dataset-level normalization statistics.
///
/// `mean` is the mean of per-image means and `std` the mean of per-image
/// standard deviations. This equals the pixel-weighted statistic only because
/// every image is measured at the same size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Per-channel dataset mean
    pub mean: [f64; CHANNELS],

    /// Per-channel dataset standard deviation
    pub std: [f64; CHANNELS],

    /// Number of images the statistics were computed over
    pub images: usize,
}

/// A source image that was skipped during conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedImage {
    /// Path of the skipped source file
    pub path: PathBuf,

    /// Human-readable failure reason
    pub reason: String,
}

/// The full outcome of a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Files written, in processing order
    pub written: Vec<PathBuf>,

    /// Source files that were skipped
    pub failures: Vec<FailedImage>,

    /// Dataset statistics, `None` when no image was converted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DatasetStats>,
}

impl ConversionReport {
    /// Dataset statistics, or `EmptyDataset` when nothing was observed.
    pub fn dataset_stats(&self) -> Result<DatasetStats, PipelineError> {
        self.stats.ok_or(PipelineError::EmptyDataset)
    }

    /// Total number of source files the run attempted.
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

/// A named per-epoch metric series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossSeries {
    /// Metric name
    pub name: String,

    /// One value per epoch
    pub values: Vec<f64>,
}

impl LossSeries {
    /// Create a new named series.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_has_no_stats() {
        let report = ConversionReport::default();
        assert!(matches!(
            report.dataset_stats(),
            Err(PipelineError::EmptyDataset)
        ));
        assert_eq!(report.attempted(), 0);
    }

    #[test]
    fn test_report_serialization_skips_missing_stats() {
        let report = ConversionReport {
            written: vec![PathBuf::from("out/a.jpg")],
            failures: vec![FailedImage {
                path: PathBuf::from("in/b.png"),
                reason: "bad header".into(),
            }],
            stats: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("stats"));
        assert!(json.contains("bad header"));
        assert_eq!(report.attempted(), 2);
    }

    #[test]
    fn test_dataset_stats_roundtrip() {
        let stats = DatasetStats {
            mean: [0.89, 0.88, 0.87],
            std: [0.2, 0.21, 0.22],
            images: 3,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: DatasetStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
