//! Pipeline orchestration - wires together all conversion stages.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::sink::OutputSink;
use crate::types::{ConversionReport, FailedImage};

use super::decode::ImageDecoder;
use super::discovery::{DiscoveredFile, FileDiscovery};
use super::encode::JpegWriter;
use super::stats::StatsAccumulator;
use super::transform::ImageTransformer;
use super::validate::Validator;

/// Progress notification emitted after each source file.
#[derive(Debug, Clone, Copy)]
pub struct ConvertProgress<'a> {
    /// Files handled so far, including this one
    pub completed: usize,
    /// Total files discovered
    pub total: usize,
    /// Source file just handled
    pub path: &'a Path,
    /// Whether the file was skipped
    pub failed: bool,
}

/// Converts a directory of source images and measures the result.
pub struct Converter {
    discovery: FileDiscovery,
    validator: Validator,
    decoder: ImageDecoder,
    transformer: ImageTransformer,
    writer: JpegWriter,
}

impl Converter {
    /// Create a converter from the `[convert]` and `[limits]` settings.
    pub fn new(config: &Config) -> Self {
        Self {
            discovery: FileDiscovery::new(&config.convert),
            validator: Validator::new(config.limits.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            transformer: ImageTransformer::new(config.convert.size()),
            writer: JpegWriter::new(config.convert.quality),
        }
    }

    /// Target size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.transformer.size()
    }

    /// Discover the source images a run would convert.
    pub fn discover(&self, input_dir: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        self.discovery.discover(input_dir)
    }

    /// Convert every source image in `input_dir` into `sink`.
    pub fn run(
        &self,
        input_dir: &Path,
        sink: &mut dyn OutputSink,
    ) -> PipelineResult<ConversionReport> {
        self.run_with_progress(input_dir, sink, |_| {})
    }

    /// Like [`Converter::run`], reporting progress after each file.
    ///
    /// Per-file failures (unreadable or undecodable sources) are logged,
    /// recorded in the report and skipped. A source whose output name was
    /// already written in this run (`a.png` and `a.PNG`) is skipped the same
    /// way, so every measured image is still on disk. Output and statistics
    /// failures abort the run.
    pub fn run_with_progress<F>(
        &self,
        input_dir: &Path,
        sink: &mut dyn OutputSink,
        mut on_progress: F,
    ) -> PipelineResult<ConversionReport>
    where
        F: FnMut(&ConvertProgress<'_>),
    {
        let start = Instant::now();
        let files = self.discovery.discover(input_dir)?;
        tracing::info!(
            "Found {} source image(s) in {:?} ({} bytes)",
            files.len(),
            input_dir,
            FileDiscovery::total_size(&files)
        );

        sink.prepare().map_err(|source| PipelineError::Io {
            path: sink.location().to_path_buf(),
            source,
        })?;

        let mut accumulator = StatsAccumulator::new();
        let mut report = ConversionReport::default();
        let total = files.len();
        let mut produced = HashSet::new();

        for (index, file) in files.iter().enumerate() {
            let name = JpegWriter::output_name(&file.path);
            let outcome = if produced.contains(&name) {
                Err(PipelineError::DuplicateOutput {
                    path: file.path.clone(),
                    name: name.clone(),
                })
            } else {
                self.convert_one(&file.path, sink, &mut accumulator)
            };

            let failed = match outcome {
                Ok(written) => {
                    produced.insert(name);
                    report.written.push(written);
                    false
                }
                Err(e) if e.is_per_file() => {
                    tracing::warn!("Skipping {:?}: {}", file.path, e);
                    report.failures.push(FailedImage {
                        path: file.path.clone(),
                        reason: e.to_string(),
                    });
                    true
                }
                Err(e) => return Err(e),
            };

            on_progress(&ConvertProgress {
                completed: index + 1,
                total,
                path: &file.path,
                failed,
            });
        }

        report.stats = if accumulator.is_empty() {
            tracing::warn!("No images were converted from {:?}", input_dir);
            None
        } else {
            Some(accumulator.finalize()?)
        };

        tracing::info!(
            "Converted {} image(s), skipped {} in {:?}",
            report.written.len(),
            report.failures.len(),
            start.elapsed()
        );
        Ok(report)
    }

    /// Run one source file through validate → decode → transform → write → measure.
    fn convert_one(
        &self,
        path: &Path,
        sink: &mut dyn OutputSink,
        accumulator: &mut StatsAccumulator,
    ) -> PipelineResult<PathBuf> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", path);

        self.validator.validate(path)?;

        let decoded = self.decoder.decode(path)?;
        tracing::trace!(
            "  Decode: {:?} ({}x{}, alpha: {})",
            start.elapsed(),
            decoded.width,
            decoded.height,
            decoded.has_alpha()
        );

        let transformed = self.transformer.transform(&decoded.image);
        drop(decoded);

        let written = self.writer.write(sink, path, &transformed)?;
        let stats = accumulator.observe(&transformed)?;

        tracing::debug!(
            "Processed {:?} in {:?} (mean {:?}, std {:?})",
            written,
            start.elapsed(),
            stats.mean,
            stats.std
        );
        Ok(written)
    }
}
