//! Graph rendering trait and implementations

use crate::types::{ChartStyle, ExtremaChart, TimeSeriesChart, MAX_SERIES_LABEL, MIN_SERIES_LABEL};
use async_trait::async_trait;
use bikeshare_common::{DashboardError, Result};
use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::{debug, info};

/// Trait for rendering one kind of chart
#[async_trait]
pub trait GraphRenderer: Send + Sync {
    /// The chart data this renderer draws
    type Data: Send + Sync;

    /// Render the chart as an SVG document
    async fn render_svg(&self, data: &Self::Data, style: &ChartStyle) -> Result<String>;

    /// Render the chart as a PNG file at `path`
    async fn render_to_file(&self, data: &Self::Data, style: &ChartStyle, path: &Path)
        -> Result<()>;

    /// Gets the name of this graph type.
    fn name(&self) -> &'static str;

    /// Gets the description of this graph type.
    fn description(&self) -> &'static str;
}

/// Parse a `#RRGGBB` color, falling back to black
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}

/// Top of the y axis, leaving headroom for value labels
fn y_axis_top(peak: u64) -> u64 {
    peak.saturating_add(peak / 8).saturating_add(1)
}

/// Draws on an SVG string buffer
fn svg_document<F>(style: &ChartStyle, draw: F) -> Result<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Draws into a PNG file, creating its parent directory
fn png_file<F>(style: &ChartStyle, path: &Path, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw(&root)?;
    root.present()?;
    Ok(())
}

/// Bar chart of max and min rentals per category.
///
/// The max bars are drawn first and the min bars over them at the same
/// category, so each category reads as one bar split at its minimum.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarChartRenderer;

impl BarChartRenderer {
    /// Creates a new bar chart renderer
    pub const fn new() -> Self {
        Self
    }

    fn draw<DB>(
        root: &DrawingArea<DB, Shift>,
        chart_data: &ExtremaChart,
        style: &ChartStyle,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if chart_data.is_empty() {
            return Err(DashboardError::graph(format!(
                "No data available for '{}'",
                chart_data.title
            )));
        }
        if chart_data.max_values.len() != chart_data.categories.len()
            || chart_data.min_values.len() != chart_data.categories.len()
        {
            return Err(DashboardError::graph(format!(
                "Series length does not match categories for '{}'",
                chart_data.title
            )));
        }

        root.fill(&parse_color(&style.background_color))?;

        let max_color = parse_color(&style.max_color);
        let min_color = parse_color(&style.min_color);
        let family = style.font_family.as_str();
        let categories = &chart_data.categories;
        let category_count = u32::try_from(categories.len())
            .map_err(|e| DashboardError::graph_with_source("Too many categories", e))?;

        let mut chart = ChartBuilder::on(root)
            .caption(&chart_data.title, (family, style.title_font_size))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(
                (0u32..category_count).into_segmented(),
                0u64..y_axis_top(chart_data.peak()),
            )?;

        let label_formatter = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(index) | SegmentValue::Exact(index) => categories
                .get(*index as usize)
                .cloned()
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(&chart_data.x_label)
            .y_desc(&chart_data.y_label)
            .x_labels(categories.len())
            .x_label_formatter(&label_formatter)
            .label_style((family, style.font_size))
            .axis_desc_style((family, style.font_size + 2));
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        for (values, color, label) in [
            (&chart_data.max_values, max_color, MAX_SERIES_LABEL),
            (&chart_data.min_values, min_color, MIN_SERIES_LABEL),
        ] {
            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(color.filled())
                        .margin(8)
                        .data(values.iter().zip(0u32..).map(|(value, index)| (index, *value))),
                )?
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        if style.show_values {
            let value_style = TextStyle::from((family, style.font_size).into_font().style(FontStyle::Bold))
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            let labels: Vec<_> = chart_data
                .max_values
                .iter()
                .zip(&chart_data.min_values)
                .zip(0u32..)
                .flat_map(|((max, min), index)| [(index, *max), (index, *min)])
                .map(|(index, value)| {
                    Text::new(
                        value.to_string(),
                        (SegmentValue::CenterOf(index), value),
                        value_style.clone(),
                    )
                })
                .collect();
            chart.draw_series(labels)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font((family, style.font_size))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }
}

#[async_trait]
impl GraphRenderer for BarChartRenderer {
    type Data = ExtremaChart;

    async fn render_svg(&self, data: &ExtremaChart, style: &ChartStyle) -> Result<String> {
        let svg = svg_document(style, |root| Self::draw(root, data, style))?;
        debug!(title = %data.title, bytes = svg.len(), "Rendered bar chart");
        Ok(svg)
    }

    async fn render_to_file(&self, data: &ExtremaChart, style: &ChartStyle, path: &Path) -> Result<()> {
        png_file(style, path, |root| Self::draw(root, data, style))?;
        info!("Successfully rendered bar chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "extrema_bar_chart"
    }

    fn description(&self) -> &'static str {
        "Max and min rentals per category as overlaid bars"
    }
}

/// Line chart of rentals over time
#[derive(Debug, Clone, Copy, Default)]
pub struct LineChartRenderer;

impl LineChartRenderer {
    /// Creates a new line chart renderer
    pub const fn new() -> Self {
        Self
    }

    fn draw<DB>(
        root: &DrawingArea<DB, Shift>,
        chart_data: &TimeSeriesChart,
        style: &ChartStyle,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        if chart_data.is_empty() {
            return Err(DashboardError::graph(format!(
                "No data available for '{}'",
                chart_data.title
            )));
        }

        root.fill(&parse_color(&style.background_color))?;

        let line_color = parse_color(&style.line_color);
        let family = style.font_family.as_str();
        let labels = &chart_data.labels;
        let last_index = i32::try_from(labels.len().saturating_sub(1))
            .map_err(|e| DashboardError::graph_with_source("Too many months", e))?;

        let mut chart = ChartBuilder::on(root)
            .caption(&chart_data.title, (family, style.title_font_size))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(0..last_index.max(1), 0u64..y_axis_top(chart_data.peak()))?;

        let label_formatter = |index: &i32| {
            usize::try_from(*index)
                .ok()
                .and_then(|i| labels.get(i))
                .cloned()
                .unwrap_or_default()
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_desc(&chart_data.x_label)
            .y_desc(&chart_data.y_label)
            .x_labels(labels.len().min(12))
            .x_label_formatter(&label_formatter)
            .label_style((family, style.font_size))
            .axis_desc_style((family, style.font_size + 2));
        if !style.show_grid {
            mesh.disable_mesh();
        }
        mesh.draw()?;

        let points = &chart_data.points;

        chart.draw_series(LineSeries::new(points.iter().copied(), line_color.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, line_color.filled())),
        )?;

        Ok(())
    }
}

#[async_trait]
impl GraphRenderer for LineChartRenderer {
    type Data = TimeSeriesChart;

    async fn render_svg(&self, data: &TimeSeriesChart, style: &ChartStyle) -> Result<String> {
        let svg = svg_document(style, |root| Self::draw(root, data, style))?;
        debug!(title = %data.title, bytes = svg.len(), "Rendered line chart");
        Ok(svg)
    }

    async fn render_to_file(
        &self,
        data: &TimeSeriesChart,
        style: &ChartStyle,
        path: &Path,
    ) -> Result<()> {
        png_file(style, path, |root| Self::draw(root, data, style))?;
        info!("Successfully rendered line chart to {}", path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "time_series_line_chart"
    }

    fn description(&self) -> &'static str {
        "Monthly rentals as a line over time"
    }
}
