//! Image normalization pipeline components.
//!
//! This module contains all the stages of the conversion pipeline:
//! - **discovery**: Find source images in a directory
//! - **validate**: Pre-decode validation
//! - **decode**: Load and decode source images
//! - **transform**: Flatten alpha, convert to RGB, resize
//! - **encode**: Write JPEG output
//! - **stats**: Per-channel dataset statistics
//! - **processor**: Orchestrates the full pipeline

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod processor;
pub mod stats;
pub mod transform;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::JpegWriter;
pub use processor::{ConvertProgress, Converter};
pub use stats::{channel_stats, StatsAccumulator};
pub use transform::{flatten_alpha, ImageTransformer};
pub use validate::Validator;
