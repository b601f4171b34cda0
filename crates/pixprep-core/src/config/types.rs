//! Sub-configuration structs with defaults matching the reference conversion job.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Conversion job settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Directory holding the source images
    pub input_dir: PathBuf,

    /// Directory the converted images are written to
    pub output_dir: PathBuf,

    /// Target width in pixels
    pub width: u32,

    /// Target height in pixels
    pub height: u32,

    /// JPEG quality (1-100)
    pub quality: u8,

    /// Extension of the source images, without the dot
    pub source_extension: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./images/small_images"),
            output_dir: PathBuf::from("./data/images/215"),
            width: 215,
            height: 215,
            quality: 100,
            source_extension: "png".to_string(),
        }
    }
}

impl ConvertConfig {
    /// Target size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Skip files larger than this (MB)
    pub max_file_size_mb: u64,

    /// Skip images with either dimension above this (pixels)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 10000,
        }
    }
}

/// Settings for loss charts and sample grids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory charts are written to; sample grids go in `<dir>/outputs`
    pub dir: PathBuf,

    /// Maximum number of samples per grid row
    pub grid_columns: usize,

    /// Width of the train/validation chart in pixels
    pub chart_width: u32,

    /// Height of the train/validation chart in pixels
    pub chart_height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./utils"),
            grid_columns: 4,
            chart_width: 640,
            chart_height: 480,
        }
    }
}

impl ReportConfig {
    /// Directory sample grids are written to.
    pub fn outputs_dir(&self) -> PathBuf {
        self.dir.join("outputs")
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
