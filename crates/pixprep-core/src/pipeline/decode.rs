//! Image decoding with format detection and dimension limits.

use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::{Path, PathBuf};

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// A decoded source image.
#[derive(Debug)]
pub struct DecodedImage {
    /// Path the image was read from
    pub path: PathBuf,
    /// The decoded image data, in its original color type
    pub image: DynamicImage,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl DecodedImage {
    /// Whether the source carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an image from disk.
    ///
    /// The file handle lives only for the duration of this call, so it is
    /// closed before the next file is opened whether decoding succeeds or not.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let image = Self::read(path)?;

        let (width, height) = image.dimensions();
        if width > self.limits.max_image_dimension || height > self.limits.max_image_dimension {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim: self.limits.max_image_dimension,
            });
        }

        Ok(DecodedImage {
            path: path.to_path_buf(),
            image,
            width,
            height,
        })
    }

    fn read(path: &Path) -> Result<DynamicImage, PipelineError> {
        let reader = ImageReader::open(path)
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open file: {}", e),
            })?
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
