//! JPEG encoding of transformed images into an output sink.

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;
use crate::sink::OutputSink;

/// Canonical extension of the target codec.
pub const JPEG_EXTENSION: &str = "jpg";

/// Writes transformed images as JPEG files.
#[derive(Debug, Clone, Copy)]
pub struct JpegWriter {
    quality: u8,
}

impl JpegWriter {
    /// Create a writer encoding at `quality` (1-100).
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    /// Output file name for a source path: same base name, `.jpg` extension.
    pub fn output_name(source: &Path) -> String {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        format!("{stem}.{JPEG_EXTENSION}")
    }

    /// Encode an image to JPEG bytes.
    pub fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, image::ImageError> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, self.quality);
        image.write_with_encoder(encoder)?;
        Ok(buffer)
    }

    /// Encode `image` and write it to `sink` under the name derived from `source`.
    pub fn write(
        &self,
        sink: &mut dyn OutputSink,
        source: &Path,
        image: &RgbImage,
    ) -> Result<PathBuf, PipelineError> {
        let name = Self::output_name(source);
        let target = sink.location().join(&name);

        let bytes = self.encode(image).map_err(|e| PipelineError::Encode {
            path: target.clone(),
            message: e.to_string(),
        })?;

        sink.write(&name, &bytes)
            .map_err(|source| PipelineError::Io { path: target, source })
    }
}
