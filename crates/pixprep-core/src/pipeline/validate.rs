//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use image::ImageFormat;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Formats this build can decode.
const DECODABLE: [ImageFormat; 2] = [ImageFormat::Png, ImageFormat::Jpeg];

/// Validates files before decoding.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - File exists and is readable
    /// - File size is within limits
    /// - File starts with the signature of a decodable format
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)
    }

    /// Check the file header against the decodable formats.
    fn check_magic_bytes(&self, path: &Path) -> Result<(), PipelineError> {
        let mut header = [0u8; 16];
        let bytes_read = {
            let mut file = std::fs::File::open(path).map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot open file: {}", e),
            })?;
            file.read(&mut header).map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot read file header: {}", e),
            })?
        };

        if bytes_read < 4 {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        if !Self::is_decodable_header(&header[..bytes_read]) {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    fn is_decodable_header(header: &[u8]) -> bool {
        image::guess_format(header)
            .map(|format| DECODABLE.contains(&format))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_bytes_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(Validator::is_decodable_header(&header));
    }

    #[test]
    fn test_magic_bytes_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(Validator::is_decodable_header(&header));
    }

    #[test]
    fn test_magic_bytes_unsupported_format() {
        let header = [b'G', b'I', b'F', b'8', b'9', b'a', 0, 0, 0, 0, 0, 0];
        assert!(!Validator::is_decodable_header(&header));
    }

    #[test]
    fn test_magic_bytes_invalid() {
        let header = [0x00, 0x00, 0x00, 0x00, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(!Validator::is_decodable_header(&header));
    }

    #[test]
    fn test_validate_missing_file() {
        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(Path::new("/nonexistent/x.png")).unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_validate_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
        assert!(err.is_per_file());
    }

    #[test]
    fn test_validate_tiny_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        std::fs::write(&path, [0x89, b'P']).unwrap();

        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(&path).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[cfg(unix)]
    #[test]
    fn test_header_read_error_keeps_its_cause() {
        // Opening a directory succeeds on unix, reading from it does not
        let dir = tempfile::tempdir().unwrap();
        let validator = Validator::new(LimitsConfig::default());
        let err = validator.check_magic_bytes(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
        let message = err.to_string();
        assert!(message.contains("Cannot read file header"));
        assert!(!message.contains("too small"));
    }

    #[test]
    fn test_huge_size_limit_does_not_overflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.png");
        image::RgbImage::new(2, 2).save(&path).unwrap();

        let validator = Validator::new(LimitsConfig {
            max_file_size_mb: u64::MAX,
            ..LimitsConfig::default()
        });
        validator.validate(&path).unwrap();
    }
}
