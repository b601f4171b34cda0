//! Sample grid export: tile a batch of model outputs into one image.
//!
//! The layout matches the common `make_grid` convention: at most `columns`
//! images per row, a 2 pixel black border around and between tiles, and no
//! border at all for a single-image batch.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::ArrayView4;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::{Config, ReportConfig};
use crate::error::{ReportError, ReportResult};
use crate::sink::{FsSink, OutputSink};

/// Border width between tiles, in pixels.
const PADDING: u32 = 2;

/// Tiles NCHW batches into grid images.
#[derive(Debug, Clone, Copy)]
pub struct GridExporter {
    columns: usize,
}

impl GridExporter {
    /// Create an exporter placing at most `columns` images per row.
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    /// Create an exporter from the `[report]` settings.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.grid_columns)
    }

    /// Sink writing into the configured sample grid directory.
    pub fn output_sink(config: &Config) -> FsSink {
        FsSink::new(config.grid_dir())
    }

    /// Maximum number of images per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Render a `[batch, channels, height, width]` array into a grid.
    ///
    /// With `unnormalize`, values are mapped from [-1, 1] to [0, 1] and
    /// clamped. Values are then scaled to 8 bits, clamping anything outside
    /// [0, 1]. Single-channel batches are rendered as grayscale.
    pub fn render(&self, batch: ArrayView4<'_, f32>, unnormalize: bool) -> ReportResult<RgbImage> {
        let (count, channels, height, width) = batch.dim();
        if count == 0 || height == 0 || width == 0 {
            return Err(ReportError::InvalidBatch(format!(
                "batch shape {:?} has an empty dimension",
                batch.shape()
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(ReportError::InvalidBatch(format!(
                "expected 1 or 3 channels, got {channels}"
            )));
        }

        let pad = if count == 1 { 0 } else { PADDING };
        let per_row = self.columns.min(count);
        let rows = count.div_ceil(per_row);
        let cell_w = width as u32 + pad;
        let cell_h = height as u32 + pad;

        let mut grid = RgbImage::new(cell_w * per_row as u32 + pad, cell_h * rows as u32 + pad);

        for k in 0..count {
            let origin_x = (k % per_row) as u32 * cell_w + pad;
            let origin_y = (k / per_row) as u32 * cell_h + pad;
            for y in 0..height {
                for x in 0..width {
                    let sample = |c: usize| {
                        let channel = if channels == 1 { 0 } else { c };
                        let value = batch[[k, channel, y, x]];
                        to_u8(if unnormalize { unnormalize_value(value) } else { value })
                    };
                    grid.put_pixel(
                        origin_x + x as u32,
                        origin_y + y as u32,
                        Rgb([sample(0), sample(1), sample(2)]),
                    );
                }
            }
        }

        Ok(grid)
    }

    /// Render `batch` and write it to `sink` as `file_name`.
    ///
    /// The encoding follows the file extension. With `reset`, everything
    /// previously written to the sink is removed first, which is how a new
    /// training run clears samples left over from the last one.
    pub fn save(
        &self,
        sink: &mut dyn OutputSink,
        batch: ArrayView4<'_, f32>,
        file_name: &str,
        unnormalize: bool,
        reset: bool,
    ) -> ReportResult<PathBuf> {
        let target = sink.location().join(file_name);
        let format = ImageFormat::from_path(Path::new(file_name)).map_err(|e| {
            ReportError::Encode {
                path: target.clone(),
                message: e.to_string(),
            }
        })?;

        let grid = self.render(batch, unnormalize)?;

        let prepared = if reset { sink.clear() } else { sink.prepare() };
        prepared.map_err(|source| ReportError::Io {
            path: sink.location().to_path_buf(),
            source,
        })?;

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(grid)
            .write_to(&mut buffer, format)
            .map_err(|e| ReportError::Encode {
                path: target.clone(),
                message: e.to_string(),
            })?;

        let written = sink
            .write(file_name, buffer.get_ref())
            .map_err(|source| ReportError::Io {
                path: target,
                source,
            })?;
        tracing::debug!("Saved sample grid {:?}", written);
        Ok(written)
    }
}

/// Map a value from [-1, 1] to [0, 1], clamping overshoot.
#[inline]
fn unnormalize_value(value: f32) -> f32 {
    ((value + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[inline]
fn to_u8(value: f32) -> u8 {
    (value * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use ndarray::Array4;

    #[test]
    fn test_unnormalize_value() {
        assert_eq!(unnormalize_value(-1.0), 0.0);
        assert_eq!(unnormalize_value(0.0), 0.5);
        assert_eq!(unnormalize_value(1.0), 1.0);
        assert_eq!(unnormalize_value(1.7), 1.0);
        assert_eq!(unnormalize_value(-3.0), 0.0);
    }

    #[test]
    fn test_to_u8_rounds_and_clamps() {
        assert_eq!(to_u8(0.0), 0);
        assert_eq!(to_u8(0.5), 128);
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(2.0), 255);
        assert_eq!(to_u8(-0.5), 0);
    }

    #[test]
    fn test_grid_layout_with_partial_row() {
        // 6 images of 5x3, 4 per row -> 2 rows
        let batch = Array4::<f32>::zeros((6, 3, 3, 5));
        let grid = GridExporter::new(4).render(batch.view(), true).unwrap();
        assert_eq!(grid.dimensions(), (4 * 7 + 2, 2 * 5 + 2));
    }

    #[test]
    fn test_grid_narrower_than_columns() {
        let batch = Array4::<f32>::zeros((2, 3, 4, 4));
        let grid = GridExporter::new(4).render(batch.view(), false).unwrap();
        assert_eq!(grid.dimensions(), (2 * 6 + 2, 6 + 2));
    }

    #[test]
    fn test_single_image_has_no_border() {
        let batch = Array4::<f32>::from_elem((1, 3, 4, 6), 1.0);
        let grid = GridExporter::new(4).render(batch.view(), true).unwrap();
        assert_eq!(grid.dimensions(), (6, 4));
        assert!(grid.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_tiles_are_placed_after_padding() {
        let batch = Array4::<f32>::from_elem((2, 3, 2, 2), 1.0);
        let grid = GridExporter::new(4).render(batch.view(), true).unwrap();
        assert_eq!(*grid.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*grid.get_pixel(2, 2), Rgb([255, 255, 255]));
        assert_eq!(*grid.get_pixel(4, 2), Rgb([0, 0, 0]));
        assert_eq!(*grid.get_pixel(6, 2), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_grayscale_batch_is_expanded() {
        let batch = Array4::<f32>::from_elem((1, 1, 2, 2), 0.0);
        let grid = GridExporter::new(4).render(batch.view(), true).unwrap();
        assert_eq!(*grid.get_pixel(1, 1), Rgb([128, 128, 128]));
    }

    #[test]
    fn test_rejects_bad_channel_count() {
        let batch = Array4::<f32>::zeros((2, 4, 2, 2));
        let err = GridExporter::new(4).render(batch.view(), true).unwrap_err();
        assert!(matches!(err, ReportError::InvalidBatch(_)));
    }

    #[test]
    fn test_rejects_empty_batch() {
        let batch = Array4::<f32>::zeros((0, 3, 2, 2));
        let err = GridExporter::new(4).render(batch.view(), true).unwrap_err();
        assert!(matches!(err, ReportError::InvalidBatch(_)));
    }

    #[test]
    fn test_save_resets_only_when_asked() {
        let mut sink = MemorySink::new("outputs");
        let batch = Array4::<f32>::zeros((2, 3, 4, 4));
        let exporter = GridExporter::new(4);

        exporter
            .save(&mut sink, batch.view(), "epoch_000_0.png", true, true)
            .unwrap();
        exporter
            .save(&mut sink, batch.view(), "epoch_000_1.png", true, false)
            .unwrap();
        assert_eq!(sink.clear_count(), 1);
        assert_eq!(sink.len(), 2);

        exporter
            .save(&mut sink, batch.view(), "epoch_001_0.png", true, true)
            .unwrap();
        assert_eq!(sink.names(), vec!["epoch_001_0.png"]);
    }

    #[test]
    fn test_save_encodes_by_extension() {
        let mut sink = MemorySink::new("outputs");
        let batch = Array4::<f32>::zeros((1, 3, 4, 4));
        GridExporter::new(4)
            .save(&mut sink, batch.view(), "sample.png", false, false)
            .unwrap();
        let bytes = sink.get("sample.png").unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_from_config_uses_grid_columns() {
        let mut config = ReportConfig::default();
        assert_eq!(GridExporter::from_config(&config).columns(), 4);

        config.grid_columns = 2;
        let exporter = GridExporter::from_config(&config);
        let batch = Array4::<f32>::zeros((4, 3, 3, 3));
        let grid = exporter.render(batch.view(), false).unwrap();
        assert_eq!(grid.dimensions(), (2 * 5 + 2, 2 * 5 + 2));
    }

    #[test]
    fn test_output_sink_writes_to_grid_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.report.dir = dir.path().to_path_buf();

        let mut sink = GridExporter::output_sink(&config);
        assert_eq!(sink.location(), dir.path().join("outputs"));

        let batch = Array4::<f32>::zeros((2, 3, 4, 4));
        let written = GridExporter::from_config(&config.report)
            .save(&mut sink, batch.view(), "epoch_000_0.png", true, true)
            .unwrap();
        assert_eq!(written, dir.path().join("outputs").join("epoch_000_0.png"));
        assert!(written.is_file());
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let mut sink = MemorySink::new("outputs");
        let batch = Array4::<f32>::zeros((1, 3, 4, 4));
        let err = GridExporter::new(4)
            .save(&mut sink, batch.view(), "sample.unknown", false, false)
            .unwrap_err();
        assert!(matches!(err, ReportError::Encode { .. }));
        assert!(sink.is_empty());
    }
}
