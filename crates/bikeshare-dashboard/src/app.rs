//! End-to-end dashboard run.

use crate::error::AppResult;
use bikeshare_config::Config;
use bikeshare_graphs::{DashboardManager, DashboardReport, DashboardViews, DatasetLoader};
use tracing::{info, instrument};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Records read from the dataset
    pub records: usize,
    /// Files written
    pub report: DashboardReport,
}

/// Loads the dataset, computes the views and writes the dashboard
#[instrument(skip_all, fields(data = %config.data.path))]
pub async fn run(config: &Config) -> AppResult<RunSummary> {
    let dataset = DatasetLoader::from_config(&config.data)?.load_path(&config.data.path)?;

    let views = DashboardViews::compute(&dataset, config.data.time_series_granularity);

    let report = DashboardManager::from_config(config)
        .generate(&views)
        .await?;

    info!(
        records = dataset.len(),
        index = %report.index_path.display(),
        "Dashboard run complete"
    );

    Ok(RunSummary {
        records: dataset.len(),
        report,
    })
}
