//! Experiment introspection outputs used by training loops.
//!
//! - **chart**: Train/validation loss curves and per-metric small multiples
//! - **grid**: Tiled sample images from a model output batch

pub mod chart;
pub mod grid;

pub use chart::{LossPlotter, EXTRA_LOSSES_CHART, TRAIN_VAL_CHART};
pub use grid::GridExporter;
