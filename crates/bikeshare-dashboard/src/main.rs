//! Main entry point for the bike rental dashboard.

use anyhow::Context;
use bikeshare_common::init_logging;
use bikeshare_config::{ConfigError, ConfigLoader};
use bikeshare_dashboard::{run, Cli};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = ConfigLoader::resolve_path(cli.config.as_deref());
    let mut config = ConfigLoader::load(config_path.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config
        .validate_all()
        .map_err(ConfigError::from)
        .context("Invalid command line override")?;

    init_logging(config.logging.to_logging_config()).context("Failed to initialize logging")?;

    match &config_path {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("No configuration file found, using defaults"),
    }
    info!("Starting bike rental dashboard");

    match run(&config).await {
        Ok(summary) => {
            info!(
                records = summary.records,
                pngs = summary.report.png_paths.len(),
                empty_sections = summary.report.empty_sections.len(),
                "Dashboard available at {}",
                summary.report.index_path.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Dashboard generation failed: {}", e);
            Err(e.into())
        }
    }
}
