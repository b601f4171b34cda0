//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.convert.width == 0 {
            return Err(ConfigError::ValidationError(
                "convert.width must be > 0".into(),
            ));
        }
        if self.convert.height == 0 {
            return Err(ConfigError::ValidationError(
                "convert.height must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.convert.quality) {
            return Err(ConfigError::ValidationError(
                "convert.quality must be between 1 and 100".into(),
            ));
        }
        if self.convert.source_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::ValidationError(
                "convert.source_extension must not be empty".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.report.grid_columns == 0 {
            return Err(ConfigError::ValidationError(
                "report.grid_columns must be > 0".into(),
            ));
        }
        if self.report.chart_width == 0 || self.report.chart_height == 0 {
            return Err(ConfigError::ValidationError(
                "report.chart_width and report.chart_height must be > 0".into(),
            ));
        }
        Ok(())
    }
}
