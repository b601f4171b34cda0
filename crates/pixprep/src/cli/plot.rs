//! The `pixprep plot` command for rendering recorded loss curves.

use clap::Args;
use pixprep_core::{Config, FsSink, LossPlotter, LossSeries};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Arguments for the `plot` command.
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// JSON file with `train`, `val` and optional `extra` per-epoch losses
    #[arg(required = true)]
    pub losses: PathBuf,

    /// Directory charts are written to (defaults to report.dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Loss history as written by a training loop.
///
/// ```json
/// { "train": [0.9, 0.7], "val": [1.0, 0.8], "extra": { "l1": [0.3, 0.2] } }
/// ```
#[derive(Debug, Deserialize)]
struct LossHistory {
    train: Vec<f64>,
    val: Vec<f64>,
    #[serde(default)]
    extra: BTreeMap<String, Vec<f64>>,
}

impl LossHistory {
    fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        let history = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid loss history in {}: {e}", path.display()))?;
        Ok(history)
    }

    fn extra_series(&self) -> Vec<LossSeries> {
        self.extra
            .iter()
            .map(|(name, values)| LossSeries::new(name.clone(), values.clone()))
            .collect()
    }
}

/// Execute the plot command.
pub fn execute(args: PlotArgs, config: &Config) -> anyhow::Result<()> {
    let history = LossHistory::read(&args.losses)?;
    let dir = args.output.unwrap_or_else(|| config.report_dir());

    let mut sink = FsSink::new(&dir);
    let written = LossPlotter::from_config(&config.report).plot(
        &mut sink,
        &history.train,
        &history.val,
        &history.extra_series(),
    )?;

    for path in written {
        tracing::info!("Chart written to {:?}", path);
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_history_extra_is_optional() {
        let history: LossHistory = serde_json::from_str(r#"{"train":[1.0],"val":[2.0]}"#).unwrap();
        assert!(history.extra_series().is_empty());
    }

    #[test]
    fn loss_history_extra_is_sorted_by_name() {
        let history: LossHistory = serde_json::from_str(
            r#"{"train":[1.0],"val":[2.0],"extra":{"kl":[0.1],"adv":[0.2]}}"#,
        )
        .unwrap();
        let names: Vec<_> = history.extra_series().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["adv", "kl"]);
    }

    #[test]
    fn execute_writes_charts() {
        let dir = tempfile::tempdir().unwrap();
        let losses = dir.path().join("losses.json");
        std::fs::write(
            &losses,
            r#"{"train":[1.0,0.6,0.4],"val":[1.1,0.9,0.8],"extra":{"l1":[0.5,0.4,0.3]}}"#,
        )
        .unwrap();

        let out = dir.path().join("charts");
        let args = PlotArgs {
            losses,
            output: Some(out.clone()),
        };
        execute(args, &Config::default()).unwrap();

        assert!(out.join("train_val_loss.jpg").is_file());
        assert!(out.join("individual_losses.jpg").is_file());
    }

    #[test]
    fn execute_rejects_mismatched_lengths() {
        let dir = tempfile::tempdir().unwrap();
        let losses = dir.path().join("losses.json");
        std::fs::write(&losses, r#"{"train":[1.0,0.6],"val":[1.1]}"#).unwrap();

        let args = PlotArgs {
            losses,
            output: Some(dir.path().join("charts")),
        };
        let err = execute(args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("validation"));
    }
}
