//! Progress bar and end-of-run summary for the convert command.

use std::time::Duration;

use pixprep_core::{ConversionReport, DatasetStats};

/// Create a progress bar for a conversion run.
pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Format a per-channel vector the way normalization constants are usually pasted.
pub fn format_channels(values: &[f64; 3]) -> String {
    format!("[{:.8}, {:.8}, {:.8}]", values[0], values[1], values[2])
}

/// Text rendition of dataset statistics for stdout.
pub fn format_stats(stats: &DatasetStats) -> String {
    format!(
        "Dataset Mean: {}\nDataset Std: {}",
        format_channels(&stats.mean),
        format_channels(&stats.std)
    )
}

/// Print a formatted summary table after a conversion run.
pub fn print_summary(report: &ConversionReport, size: (u32, u32), elapsed: Duration) {
    let rate = if elapsed.as_secs_f64() > 0.0 {
        report.written.len() as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Converted:    {:>8}", report.written.len());
    if !report.failures.is_empty() {
        eprintln!("    Failed:       {:>8}", report.failures.len());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", report.attempted());
    eprintln!("    Target size:  {:>8}", format!("{}x{}", size.0, size.1));
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
    for failure in &report.failures {
        eprintln!("    ! {}: {}", failure.path.display(), failure.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_channels() {
        assert_eq!(
            format_channels(&[1.0, 0.0, 0.5]),
            "[1.00000000, 0.00000000, 0.50000000]"
        );
    }

    #[test]
    fn test_format_stats_has_both_lines() {
        let stats = DatasetStats {
            mean: [0.9, 0.88, 0.87],
            std: [0.2, 0.21, 0.22],
            images: 4,
        };
        let text = format_stats(&stats);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Dataset Mean: [0.9"));
        assert!(lines[1].starts_with("Dataset Std: [0.2"));
    }
}
