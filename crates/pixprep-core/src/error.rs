//! Error types for the pixprep dataset preparation pipeline.
//!
//! Errors are organized by stage to provide clear, actionable error messages
//! that include relevant context (file paths, stage names, specific issues).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pixprep operations.
#[derive(Error, Debug)]
pub enum PixprepError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Chart and sample grid errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input directory is missing or not a directory
    #[error("Input directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Another source in the same run already produced this output name
    #[error("Output {name} already written by an earlier source, skipping {path}")]
    DuplicateOutput { path: PathBuf, name: String },

    /// Encoding the transformed image failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Writing to the output location failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Statistics were requested before any image was observed
    #[error("Cannot compute dataset statistics: no images were observed")]
    EmptyDataset,

    /// An observed image does not share the dimensions of the first one
    #[error("Image size mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

impl PipelineError {
    /// Whether this error only affects the file being processed.
    ///
    /// Per-file errors skip the offending image and let the batch continue.
    /// Everything else aborts the run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::FileNotFound(_)
                | Self::FileTooLarge { .. }
                | Self::ImageTooLarge { .. }
                | Self::DuplicateOutput { .. }
        )
    }
}

/// Errors from the loss plotter and sample grid exporter.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A loss series contained no values
    #[error("Loss series is empty")]
    EmptySeries,

    /// A series does not have one value per epoch
    #[error("Series {name} has {actual} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// Sample batch has the wrong shape
    #[error("Invalid sample batch: {0}")]
    InvalidBatch(String),

    /// Image encoding failed
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Writing to the output location failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for pixprep results.
pub type Result<T> = std::result::Result<T, PixprepError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Convenience type alias for report-specific results.
pub type ReportResult<T> = std::result::Result<T, ReportError>;
