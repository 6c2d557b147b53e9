//! Dashboard manager orchestrating chart rendering and page output.

use crate::aggregator::{DashboardViews, Dimension, ExtremaView};
use crate::dashboard::{DashboardPage, SectionContent};
use crate::renderer::{BarChartRenderer, GraphRenderer, LineChartRenderer};
use crate::types::{ChartStyle, ExtremaChart, TimeSeriesChart};
use bikeshare_common::Result;
use bikeshare_config::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// File name of the dashboard page
pub const INDEX_FILE: &str = "index.html";

/// File name of the JSON export of the views
pub const VIEWS_FILE: &str = "views.json";

const SERIES_HEADING: &str = "Bike Rentals Over Time";
const SERIES_FILE_STEM: &str = "rentals_over_time";

const fn extrema_heading(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::Season => "Bike Rentals by Season",
        Dimension::Month => "Bike Rentals by Month",
        Dimension::Weekday => "Bike Rentals by Day of the Week",
        Dimension::Hour => "Bike Rentals by Hour",
    }
}

/// Page and output settings of a [`DashboardManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Page title shown in the sidebar
    pub title: String,
    /// Optional author line
    pub author: Option<String>,
    /// Optional sidebar image
    pub logo_url: Option<String>,
    /// Directory receiving every output file
    pub output_dir: PathBuf,
    /// Also write each chart as PNG
    pub write_png: bool,
    /// Also write the views as JSON
    pub write_json: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self::from(&bikeshare_config::DashboardConfig::default())
    }
}

impl From<&bikeshare_config::DashboardConfig> for DashboardSettings {
    fn from(config: &bikeshare_config::DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            logo_url: config.logo_url.clone(),
            output_dir: PathBuf::from(&config.output_dir),
            write_png: config.write_png,
            write_json: config.write_json,
        }
    }
}

/// What a dashboard run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardReport {
    /// The written page
    pub index_path: PathBuf,
    /// PNG copies of the charts
    pub png_paths: Vec<PathBuf>,
    /// The JSON export, when enabled
    pub json_path: Option<PathBuf>,
    /// Headings of the sections shown without a chart
    pub empty_sections: Vec<String>,
}

enum PlannedChart {
    Series(TimeSeriesChart),
    Extrema(ExtremaChart),
}

struct PlannedSection {
    heading: &'static str,
    file_stem: String,
    chart: Option<PlannedChart>,
}

impl PlannedSection {
    fn series(views: &DashboardViews) -> Self {
        let chart = TimeSeriesChart::from_monthly(&views.monthly);
        Self {
            heading: SERIES_HEADING,
            file_stem: SERIES_FILE_STEM.to_string(),
            chart: (!chart.is_empty()).then_some(PlannedChart::Series(chart)),
        }
    }

    fn extrema(view: &ExtremaView) -> Self {
        let chart = ExtremaChart::from_view(view);
        Self {
            heading: extrema_heading(view.dimension),
            file_stem: format!("rentals_by_{}", view.dimension.slug()),
            chart: (!chart.is_empty()).then_some(PlannedChart::Extrema(chart)),
        }
    }
}

/// Renders the dashboard views and writes the page.
///
/// Output is all-or-nothing: every chart is rendered in memory first, and
/// `index.html` only replaces a previous page once all of them succeeded.
#[derive(Debug, Clone, Default)]
pub struct DashboardManager {
    style: ChartStyle,
    settings: DashboardSettings,
    bar_renderer: BarChartRenderer,
    line_renderer: LineChartRenderer,
}

impl DashboardManager {
    /// Manager drawing with `style` and writing per `settings`
    pub const fn new(style: ChartStyle, settings: DashboardSettings) -> Self {
        Self {
            style,
            settings,
            bar_renderer: BarChartRenderer::new(),
            line_renderer: LineChartRenderer::new(),
        }
    }

    /// Manager built from the `graph` and `dashboard` configuration sections
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            ChartStyle::from(&config.graph),
            DashboardSettings::from(&config.dashboard),
        )
    }

    /// Where the page is written
    pub fn output_dir(&self) -> &Path {
        &self.settings.output_dir
    }

    /// Renders every view and writes the page plus the optional PNG and JSON files
    #[instrument(skip_all, fields(output_dir = %self.settings.output_dir.display()))]
    pub async fn generate(&self, views: &DashboardViews) -> Result<DashboardReport> {
        let sections: Vec<PlannedSection> = std::iter::once(PlannedSection::series(views))
            .chain(views.extrema_views().into_iter().map(PlannedSection::extrema))
            .collect();

        let mut page = DashboardPage::new(&self.settings.title)
            .with_author(self.settings.author.clone())
            .with_logo(self.settings.logo_url.clone());
        let mut report = DashboardReport::default();

        for section in &sections {
            let content = match &section.chart {
                Some(chart) => SectionContent::Chart {
                    svg: self.render_svg(chart).await?,
                    png_file: self
                        .settings
                        .write_png
                        .then(|| format!("{}.png", section.file_stem)),
                },
                None => {
                    warn!(
                        section = section.heading,
                        "EmptyInputWarning: no rows for this view, showing notice instead of a chart"
                    );
                    report.empty_sections.push(section.heading.to_string());
                    SectionContent::Empty
                }
            };
            debug!(section = section.heading, "Rendered dashboard section");
            page.push_section(section.heading, content);
        }

        tokio::fs::create_dir_all(&self.settings.output_dir).await?;

        if self.settings.write_png {
            for section in &sections {
                if let Some(chart) = &section.chart {
                    let path = self
                        .settings
                        .output_dir
                        .join(format!("{}.png", section.file_stem));
                    self.render_png(chart, &path).await?;
                    report.png_paths.push(path);
                }
            }
        }

        if self.settings.write_json {
            let path = self.settings.output_dir.join(VIEWS_FILE);
            write_replacing(&path, serde_json::to_string_pretty(views)?.as_bytes()).await?;
            report.json_path = Some(path);
        }

        report.index_path = self.settings.output_dir.join(INDEX_FILE);
        write_replacing(&report.index_path, page.to_html().as_bytes()).await?;

        info!(
            index = %report.index_path.display(),
            pngs = report.png_paths.len(),
            empty_sections = report.empty_sections.len(),
            "Dashboard written"
        );
        Ok(report)
    }

    async fn render_svg(&self, chart: &PlannedChart) -> Result<String> {
        match chart {
            PlannedChart::Series(data) => self.line_renderer.render_svg(data, &self.style).await,
            PlannedChart::Extrema(data) => self.bar_renderer.render_svg(data, &self.style).await,
        }
    }

    async fn render_png(&self, chart: &PlannedChart, path: &Path) -> Result<()> {
        match chart {
            PlannedChart::Series(data) => {
                self.line_renderer
                    .render_to_file(data, &self.style, path)
                    .await
            }
            PlannedChart::Extrema(data) => {
                self.bar_renderer
                    .render_to_file(data, &self.style, path)
                    .await
            }
        }
    }
}

/// Writes `contents` beside `path` and renames it into place
async fn write_replacing(path: &Path, contents: &[u8]) -> Result<()> {
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    tokio::fs::write(&staging, contents).await?;
    tokio::fs::rename(&staging, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RentalDataset;
    use bikeshare_common::Granularity;

    fn settings_in(dir: &Path) -> DashboardSettings {
        DashboardSettings {
            output_dir: dir.join("site"),
            ..DashboardSettings::default()
        }
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.dashboard.author = Some("Reihan Septyawan".to_string());
        config.dashboard.output_dir = "public".to_string();
        config.graph.width = 1280;

        let manager = DashboardManager::from_config(&config);

        assert_eq!(manager.output_dir(), Path::new("public"));
        assert_eq!(manager.settings.author.as_deref(), Some("Reihan Septyawan"));
        assert_eq!(manager.style.width, 1280);
        assert!(manager.settings.write_json);
    }

    #[test]
    fn test_section_plan_order() {
        let views = DashboardViews::compute(&RentalDataset::default(), Granularity::Daily);
        let plan: Vec<_> = std::iter::once(PlannedSection::series(&views))
            .chain(views.extrema_views().into_iter().map(PlannedSection::extrema))
            .map(|s| (s.heading, s.file_stem, s.chart.is_none()))
            .collect();

        assert_eq!(
            plan,
            vec![
                ("Bike Rentals Over Time", "rentals_over_time".to_string(), true),
                ("Bike Rentals by Season", "rentals_by_season".to_string(), true),
                ("Bike Rentals by Month", "rentals_by_month".to_string(), true),
                ("Bike Rentals by Day of the Week", "rentals_by_weekday".to_string(), true),
                ("Bike Rentals by Hour", "rentals_by_hour".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_views_render_notices() {
        let dir = tempfile::tempdir().unwrap();
        let manager = DashboardManager::new(ChartStyle::default(), settings_in(dir.path()));
        let views = DashboardViews::compute(&RentalDataset::default(), Granularity::Daily);

        let report = manager.generate(&views).await.unwrap();

        assert_eq!(report.empty_sections.len(), 5);
        assert!(report.png_paths.is_empty());

        let html = std::fs::read_to_string(&report.index_path).unwrap();
        assert_eq!(html.matches(crate::dashboard::NO_DATA_NOTICE).count(), 5);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(report.json_path.unwrap()).unwrap())
                .unwrap();
        assert_eq!(json["monthly"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_json_export_can_be_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DashboardSettings {
            write_json: false,
            ..settings_in(dir.path())
        };
        let manager = DashboardManager::new(ChartStyle::default(), settings);
        let views = DashboardViews::compute(&RentalDataset::default(), Granularity::Daily);

        let report = manager.generate(&views).await.unwrap();

        assert!(report.json_path.is_none());
        assert!(!dir.path().join("site").join(VIEWS_FILE).exists());
        assert!(!dir.path().join("site").join("index.html.tmp").exists());
    }
}
