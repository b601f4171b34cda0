//! Per-channel brightness statistics for input normalization.
//!
//! Each image contributes its own per-channel mean and population standard
//! deviation over pixels scaled to [0, 1]. The dataset values are plain
//! averages of those per-image values. That only equals the pixel-weighted
//! statistic when every image has the same dimensions, so the accumulator
//! refuses images whose size differs from the first one observed.

use image::RgbImage;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DatasetStats, PerImageStats, CHANNELS};

/// Collects per-image statistics and reduces them to dataset statistics.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    entries: Vec<PerImageStats>,
    dimensions: Option<(u32, u32)>,
}

impl StatsAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure one image and record the result.
    pub fn observe(&mut self, image: &RgbImage) -> PipelineResult<PerImageStats> {
        let actual = image.dimensions();
        match self.dimensions {
            Some(expected) if expected != actual => {
                return Err(PipelineError::SizeMismatch { expected, actual });
            }
            Some(_) => {}
            None => self.dimensions = Some(actual),
        }

        let stats = channel_stats(image);
        self.entries.push(stats);
        Ok(stats)
    }

    /// Number of images observed so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no image has been observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reduce all observations to dataset statistics.
    ///
    /// Fails with [`PipelineError::EmptyDataset`] if nothing was observed.
    pub fn finalize(self) -> PipelineResult<DatasetStats> {
        if self.entries.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }

        let count = self.entries.len() as f64;
        let mut mean = [0.0; CHANNELS];
        let mut std = [0.0; CHANNELS];
        for entry in &self.entries {
            for c in 0..CHANNELS {
                mean[c] += entry.mean[c];
                std[c] += entry.std[c];
            }
        }
        for c in 0..CHANNELS {
            mean[c] /= count;
            std[c] /= count;
        }

        Ok(DatasetStats {
            mean,
            std,
            images: self.entries.len(),
        })
    }
}

/// Per-channel mean and population standard deviation of `image` in [0, 1].
pub fn channel_stats(image: &RgbImage) -> PerImageStats {
    let pixels = (image.width() as usize) * (image.height() as usize);
    if pixels == 0 {
        return PerImageStats {
            mean: [0.0; CHANNELS],
            std: [0.0; CHANNELS],
        };
    }
    let n = pixels as f64;

    let mut sum = [0.0f64; CHANNELS];
    for pixel in image.pixels() {
        for c in 0..CHANNELS {
            sum[c] += normalize(pixel[c]);
        }
    }
    let mean = sum.map(|s| s / n);

    let mut squared = [0.0f64; CHANNELS];
    for pixel in image.pixels() {
        for c in 0..CHANNELS {
            let d = normalize(pixel[c]) - mean[c];
            squared[c] += d * d;
        }
    }
    let std = squared.map(|s| (s / n).sqrt());

    PerImageStats { mean, std }
}

#[inline]
fn normalize(value: u8) -> f64 {
    f64::from(value) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const EPS: f64 = 1e-9;

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for c in 0..3 {
            assert!((a[c] - b[c]).abs() < EPS, "{a:?} != {b:?}");
        }
    }

    fn checkerboard() -> RgbImage {
        RgbImage::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255, 0, 51])
            } else {
                Rgb([0, 0, 153])
            }
        })
    }

    #[test]
    fn test_all_black_is_zero() {
        let stats = channel_stats(&RgbImage::new(8, 8));
        assert_eq!(stats.mean, [0.0; 3]);
        assert_eq!(stats.std, [0.0; 3]);
    }

    #[test]
    fn test_checkerboard_population_std() {
        let stats = channel_stats(&checkerboard());
        assert_close(stats.mean, [0.5, 0.0, 0.4]);
        // Two values with equal weight: population std is half their distance
        assert_close(stats.std, [0.5, 0.0, 0.2]);
    }

    #[test]
    fn test_single_observation_is_its_own_dataset() {
        let mut acc = StatsAccumulator::new();
        let own = acc.observe(&checkerboard()).unwrap();
        let dataset = acc.finalize().unwrap();
        assert_close(dataset.mean, own.mean);
        assert_close(dataset.std, own.std);
        assert_eq!(dataset.images, 1);
    }

    #[test]
    fn test_order_independent() {
        let a = checkerboard();
        let b = RgbImage::from_pixel(4, 4, Rgb([10, 200, 30]));

        let mut forward = StatsAccumulator::new();
        forward.observe(&a).unwrap();
        forward.observe(&b).unwrap();

        let mut backward = StatsAccumulator::new();
        backward.observe(&b).unwrap();
        backward.observe(&a).unwrap();

        let forward = forward.finalize().unwrap();
        let backward = backward.finalize().unwrap();
        assert_close(forward.mean, backward.mean);
        assert_close(forward.std, backward.std);
    }

    #[test]
    fn test_mean_of_means() {
        let mut acc = StatsAccumulator::new();
        acc.observe(&RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])))
            .unwrap();
        acc.observe(&RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))).unwrap();
        let stats = acc.finalize().unwrap();
        assert_close(stats.mean, [0.5; 3]);
        assert_close(stats.std, [0.0; 3]);
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let noisy = RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16) as u8, (y * 16) as u8, ((x * y) % 256) as u8])
        });
        let stats = channel_stats(&noisy);
        for c in 0..3 {
            assert!((0.0..=1.0).contains(&stats.mean[c]));
            assert!((0.0..=0.5).contains(&stats.std[c]));
        }
    }

    #[test]
    fn test_finalize_empty_fails() {
        let err = StatsAccumulator::new().finalize().unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mut acc = StatsAccumulator::new();
        acc.observe(&RgbImage::new(4, 4)).unwrap();
        let err = acc.observe(&RgbImage::new(4, 5)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SizeMismatch {
                expected: (4, 4),
                actual: (4, 5)
            }
        ));
        assert_eq!(acc.len(), 1);
    }
}
