//! The `pixprep config` command: inspect, check and create config files.

use clap::{Args, Subcommand};
use pixprep_core::Config;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the active configuration as TOML
    Show {
        /// Print the resolved conversion job instead (expanded paths, size)
        #[arg(long)]
        resolved: bool,
    },

    /// Show config file path
    Path,

    /// Parse and validate a config file without running anything
    Check {
        /// File to check (defaults to the platform config path)
        file: Option<PathBuf>,
    },

    /// Write a config file holding the default 215x215 job
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,

        /// Where to write it (defaults to the platform config path)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Execute the config command against the already loaded `config`.
pub fn execute(args: ConfigArgs, config: &Config) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { resolved: false } => println!("{}", config.to_toml()?),
        ConfigCommand::Show { resolved: true } => print!("{}", describe_job(config)),
        ConfigCommand::Path => println!("{}", Config::default_path().display()),
        ConfigCommand::Check { file } => {
            let path = file.unwrap_or_else(Config::default_path);
            let checked = check(&path)?;
            println!("{} is valid", path.display());
            print!("{}", describe_job(&checked));
        }
        ConfigCommand::Init { force, path } => {
            let path = path.unwrap_or_else(Config::default_path);
            init_at(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }
    Ok(())
}

/// The job a bare `pixprep convert` would run, one setting per line.
fn describe_job(config: &Config) -> String {
    let convert = &config.convert;
    let mut out = String::new();
    let _ = writeln!(out, "input:    {}", config.input_dir().display());
    let _ = writeln!(out, "output:   {}", config.output_dir().display());
    let _ = writeln!(out, "matching: *.{}", convert.source_extension);
    let _ = writeln!(out, "size:     {}x{}", convert.width, convert.height);
    let _ = writeln!(out, "quality:  {}", convert.quality);
    let _ = writeln!(out, "charts:   {}", config.report_dir().display());
    let _ = writeln!(out, "grids:    {}", config.grid_dir().display());
    out
}

fn check(path: &Path) -> anyhow::Result<Config> {
    if !path.is_file() {
        anyhow::bail!("No config file at {}", path.display());
    }
    Config::load_from(path).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

fn init_at(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_job_shows_resolved_paths_and_size() {
        let mut config = Config::default();
        config.convert.width = 128;
        config.convert.height = 96;
        config.report.dir = PathBuf::from("~/runs");

        let text = describe_job(&config);
        assert!(text.contains("input:    ./images/small_images"));
        assert!(text.contains("output:   ./data/images/215"));
        assert!(text.contains("size:     128x96"));
        assert!(text.contains("matching: *.png"));
        assert!(!text.contains("~/runs"));
        assert!(text.contains("runs/outputs"));
    }

    #[test]
    fn init_then_check_round_trips_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_at(&path, false).unwrap();
        let config = check(&path).unwrap();
        assert_eq!(config.convert.size(), (215, 215));
        assert_eq!(config.convert.quality, 100);
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[convert]\nwidth = 64\n").unwrap();

        let err = init_at(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("width = 64"));

        init_at(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("width = 215"));
    }

    #[test]
    fn check_reports_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[convert]\nwidth = 0\n").unwrap();

        let err = check(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn check_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = check(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("No config file"));
    }
}
