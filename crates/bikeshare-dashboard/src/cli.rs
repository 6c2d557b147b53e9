//! Command line interface.

use bikeshare_config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Builds the bike rental dashboard from a rental dataset.
#[derive(Debug, Parser)]
#[command(name = "bikeshare-dashboard", version)]
#[command(about = "Aggregate a bike rental dataset into a static chart dashboard", long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Rental dataset, overriding `data.path`
    #[arg(short, long, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Output directory, overriding `dashboard.output_dir`
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Log level, overriding `logging.level`
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Also write every chart as a PNG file
    #[arg(long)]
    pub png: bool,
}

impl Cli {
    /// Applies the flags given on the command line to `config`
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data.path = data.to_string_lossy().into_owned();
        }
        if let Some(output) = &self.output {
            config.dashboard.output_dir = output.to_string_lossy().into_owned();
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.png {
            config.dashboard.write_png = true;
        }
    }
}
