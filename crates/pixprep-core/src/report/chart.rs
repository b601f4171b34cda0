//! Loss curve charts rendered straight to raster images.
//!
//! Two charts are produced: a train/validation chart where each series is
//! scaled to its own y axis (train on the left, validation on the right), and
//! an optional small-multiples grid with one panel per extra metric.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::PathBuf;

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::sink::OutputSink;
use crate::types::LossSeries;

/// File name of the train/validation chart.
pub const TRAIN_VAL_CHART: &str = "train_val_loss.jpg";

/// File name of the small-multiples chart.
pub const EXTRA_LOSSES_CHART: &str = "individual_losses.jpg";

const TRAIN_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
const VAL_COLOR: Rgb<u8> = Rgb([214, 39, 40]);
const AXIS_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const GRID_COLOR: Rgb<u8> = Rgb([222, 222, 222]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

const GRID_LINES: usize = 5;
const MAX_EPOCH_TICKS: usize = 10;
const TICK_LENGTH: f32 = 6.0;
const PANEL_COLUMNS: usize = 2;
const JPEG_QUALITY: u8 = 95;

/// Renders loss charts and writes them to a sink.
#[derive(Debug, Clone, Copy)]
pub struct LossPlotter {
    width: u32,
    height: u32,
}

impl LossPlotter {
    /// Create a plotter drawing the main chart at `width × height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(64),
            height: height.max(64),
        }
    }

    /// Create a plotter from the `[report]` settings.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.chart_width, config.chart_height)
    }

    /// Validate the series, render the charts and write them to `sink`.
    ///
    /// Returns the paths written: the train/validation chart first, then
    /// the small-multiples chart when `extra` is non-empty.
    pub fn plot(
        &self,
        sink: &mut dyn OutputSink,
        train: &[f64],
        val: &[f64],
        extra: &[LossSeries],
    ) -> ReportResult<Vec<PathBuf>> {
        check_series(train, val, extra)?;

        sink.prepare().map_err(|source| ReportError::Io {
            path: sink.location().to_path_buf(),
            source,
        })?;

        let mut written = vec![write_jpeg(
            sink,
            TRAIN_VAL_CHART,
            &self.render_train_val(train, val),
        )?];
        if !extra.is_empty() {
            written.push(write_jpeg(
                sink,
                EXTRA_LOSSES_CHART,
                &self.render_small_multiples(extra),
            )?);
        }

        tracing::debug!("Wrote {} loss chart(s) over {} epochs", written.len(), train.len());
        Ok(written)
    }

    /// Draw train loss (left axis) and validation loss (right axis).
    pub fn render_train_val(&self, train: &[f64], val: &[f64]) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.width, self.height, BACKGROUND);
        let panel = Panel::inset(0, 0, self.width, self.height);
        let epochs = train.len().max(val.len());

        panel.draw_grid(&mut canvas, epochs);
        panel.draw_frame(&mut canvas);
        panel.draw_y_axis(&mut canvas, Side::Left, TRAIN_COLOR);
        panel.draw_y_axis(&mut canvas, Side::Right, VAL_COLOR);
        panel.draw_series(&mut canvas, train, &ValueRange::of(train), TRAIN_COLOR);
        panel.draw_series(&mut canvas, val, &ValueRange::of(val), VAL_COLOR);

        canvas
    }

    /// Draw one panel per series, two per row; unused cells stay blank.
    pub fn render_small_multiples(&self, series: &[LossSeries]) -> RgbImage {
        let cell_w = self.width * 5 / 8;
        let cell_h = self.height * 2 / 3;
        let rows = series.len().div_ceil(PANEL_COLUMNS).max(1) as u32;

        let mut canvas =
            RgbImage::from_pixel(cell_w * PANEL_COLUMNS as u32, cell_h * rows, BACKGROUND);

        for (index, metric) in series.iter().enumerate() {
            let x = (index % PANEL_COLUMNS) as u32 * cell_w;
            let y = (index / PANEL_COLUMNS) as u32 * cell_h;
            let panel = Panel::inset(x, y, cell_w, cell_h);

            panel.draw_grid(&mut canvas, metric.values.len());
            panel.draw_frame(&mut canvas);
            panel.draw_y_axis(&mut canvas, Side::Left, AXIS_COLOR);
            panel.draw_series(
                &mut canvas,
                &metric.values,
                &ValueRange::of(&metric.values),
                TRAIN_COLOR,
            );
        }

        canvas
    }
}

/// Check that all series are non-empty and one value per epoch.
fn check_series(train: &[f64], val: &[f64], extra: &[LossSeries]) -> ReportResult<()> {
    if train.is_empty() {
        return Err(ReportError::EmptySeries);
    }
    let expected = train.len();
    let check = |name: &str, values: &[f64]| {
        if values.len() == expected {
            Ok(())
        } else {
            Err(ReportError::LengthMismatch {
                name: name.to_string(),
                expected,
                actual: values.len(),
            })
        }
    };
    check("validation", val)?;
    for metric in extra {
        check(&metric.name, &metric.values)?;
    }
    Ok(())
}

fn write_jpeg(sink: &mut dyn OutputSink, name: &str, image: &RgbImage) -> ReportResult<PathBuf> {
    let target = sink.location().join(name);
    let mut buffer = Vec::new();
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY))
        .map_err(|e| ReportError::Encode {
            path: target.clone(),
            message: e.to_string(),
        })?;
    sink.write(name, &buffer)
        .map_err(|source| ReportError::Io { path: target, source })
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Data-space y range of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ValueRange {
    min: f64,
    max: f64,
}

impl ValueRange {
    /// Range over the finite values, padded when flat.
    fn of(values: &[f64]) -> Self {
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if !min.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        if max - min < f64::EPSILON {
            let pad = (min.abs() * 0.05).max(0.5);
            return Self {
                min: min - pad,
                max: max + pad,
            };
        }
        Self { min, max }
    }

    /// Position of `value` within the range, 0 at `min` and 1 at `max`.
    fn fraction(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

/// Plot area in canvas pixel coordinates.
#[derive(Debug, Clone, Copy)]
struct Panel {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

impl Panel {
    /// Plot area inside a `width × height` cell at (`x`, `y`), leaving margins for ticks.
    fn inset(x: u32, y: u32, width: u32, height: u32) -> Self {
        let margin_x = (width as f32 * 0.1).max(8.0);
        let margin_y = (height as f32 * 0.08).max(8.0);
        Self {
            left: x as f32 + margin_x,
            top: y as f32 + margin_y,
            width: width as f32 - 2.0 * margin_x,
            height: height as f32 - 2.0 * margin_y,
        }
    }

    fn right(&self) -> f32 {
        self.left + self.width
    }

    fn bottom(&self) -> f32 {
        self.top + self.height
    }

    fn x(&self, index: usize, len: usize) -> f32 {
        if len <= 1 {
            return self.left + self.width / 2.0;
        }
        self.left + self.width * index as f32 / (len - 1) as f32
    }

    fn y(&self, fraction: f64) -> f32 {
        self.top + self.height * (1.0 - fraction as f32)
    }

    fn draw_grid(&self, canvas: &mut RgbImage, epochs: usize) {
        for i in 0..=GRID_LINES {
            let y = self.y(i as f64 / GRID_LINES as f64);
            draw_line_segment_mut(canvas, (self.left, y), (self.right(), y), GRID_COLOR);
        }
        let step = epochs.div_ceil(MAX_EPOCH_TICKS).max(1);
        for epoch in (0..epochs).step_by(step) {
            let x = self.x(epoch, epochs);
            draw_line_segment_mut(canvas, (x, self.top), (x, self.bottom()), GRID_COLOR);
            draw_line_segment_mut(
                canvas,
                (x, self.bottom()),
                (x, self.bottom() + TICK_LENGTH),
                AXIS_COLOR,
            );
        }
    }

    fn draw_frame(&self, canvas: &mut RgbImage) {
        let rect = Rect::at(self.left as i32, self.top as i32)
            .of_size(self.width.max(1.0) as u32, self.height.max(1.0) as u32);
        draw_hollow_rect_mut(canvas, rect, AXIS_COLOR);
    }

    fn draw_y_axis(&self, canvas: &mut RgbImage, side: Side, color: Rgb<u8>) {
        let (x, tick_end) = match side {
            Side::Left => (self.left, self.left - TICK_LENGTH),
            Side::Right => (self.right(), self.right() + TICK_LENGTH),
        };
        let axis = Rect::at(x as i32 - 1, self.top as i32).of_size(2, self.height.max(1.0) as u32);
        draw_filled_rect_mut(canvas, axis, color);
        for i in 0..=GRID_LINES {
            let y = self.y(i as f64 / GRID_LINES as f64);
            draw_line_segment_mut(canvas, (x, y), (tick_end, y), color);
        }
    }

    /// Polyline through the finite values; gaps where values are not finite.
    fn draw_series(&self, canvas: &mut RgbImage, values: &[f64], range: &ValueRange, color: Rgb<u8>) {
        let len = values.len();
        let point = |i: usize| (self.x(i, len), self.y(range.fraction(values[i])));

        if len == 1 && values[0].is_finite() {
            let (x, y) = point(0);
            let dot = Rect::at(x as i32 - 2, y as i32 - 2).of_size(5, 5);
            draw_filled_rect_mut(canvas, dot, color);
            return;
        }

        for i in 1..len {
            if !(values[i - 1].is_finite() && values[i].is_finite()) {
                continue;
            }
            let (x0, y0) = point(i - 1);
            let (x1, y1) = point(i);
            // Two pixel wide stroke
            draw_line_segment_mut(canvas, (x0, y0), (x1, y1), color);
            draw_line_segment_mut(canvas, (x0, y0 + 1.0), (x1, y1 + 1.0), color);
        }
    }
}
