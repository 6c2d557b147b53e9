//! Chart data and style types

use crate::aggregator::{Dimension, ExtremaView, MonthlyRentals};
use bikeshare_common::month_abbr;
use bikeshare_config::GraphConfig;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Y axis label shared by every chart
pub const RENTALS_AXIS_LABEL: &str = "Number of Bike Rentals";

/// Legend entry of the max bars
pub const MAX_SERIES_LABEL: &str = "Max Rentals";

/// Legend entry of the min bars
pub const MIN_SERIES_LABEL: &str = "Min Rentals";

/// Visual settings applied to every chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Background fill, `#RRGGBB`
    pub background_color: String,
    /// Fill of the max bars
    pub max_color: String,
    /// Fill of the min bars
    pub min_color: String,
    /// Stroke of the time series line
    pub line_color: String,
    /// Font family for every text element
    pub font_family: String,
    /// Size of labels and legend text
    pub font_size: u32,
    /// Size of the chart caption
    pub title_font_size: u32,
    /// Draw the background mesh
    pub show_grid: bool,
    /// Print values on top of the bars
    pub show_values: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl From<&GraphConfig> for ChartStyle {
    fn from(config: &GraphConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background_color: config.background_color.clone(),
            max_color: config.max_color.clone(),
            min_color: config.min_color.clone(),
            line_color: config.line_color.clone(),
            font_family: config.font_family.clone(),
            font_size: config.font_size,
            title_font_size: config.title_font_size,
            show_grid: config.show_grid,
            show_values: config.show_values,
        }
    }
}

/// Bars of max and min rentals per category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremaChart {
    /// Chart caption
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// One label per bar position
    pub categories: Vec<String>,
    /// Max rentals, aligned with `categories`
    pub max_values: Vec<u64>,
    /// Min rentals, aligned with `categories`
    pub min_values: Vec<u64>,
}

impl ExtremaChart {
    /// Chart with the shared y axis label
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        categories: Vec<String>,
        max_values: Vec<u64>,
        min_values: Vec<u64>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: RENTALS_AXIS_LABEL.to_string(),
            categories,
            max_values,
            min_values,
        }
    }

    /// Chart of an extrema view, one category per row
    pub fn from_view(view: &ExtremaView) -> Self {
        let (title, x_label) = match view.dimension {
            Dimension::Season => ("Max and Min Bike Rentals by Season", "Season"),
            Dimension::Month => ("Max and Min Bike Rentals per Month", "Month"),
            Dimension::Weekday => ("Max and Min Bike Rentals by Day", "Day"),
            Dimension::Hour => ("Max and Min Bike Rentals per Hour", "Hour"),
        };

        Self::new(
            title,
            x_label,
            view.rows
                .iter()
                .map(|row| view.dimension.category_label(row.key))
                .collect(),
            view.rows.iter().map(|row| row.max_rentals).collect(),
            view.rows.iter().map(|row| row.min_rentals).collect(),
        )
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Largest value across both series
    pub fn peak(&self) -> u64 {
        self.max_values
            .iter()
            .chain(&self.min_values)
            .copied()
            .max()
            .unwrap_or(0)
    }
}

/// Line of rentals over time.
///
/// The x axis counts calendar months from the first period, so a month
/// missing from the series keeps its slot on the axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesChart {
    /// Chart caption
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// `Mon YYYY` label of every month from the first to the last period
    pub labels: Vec<String>,
    /// `(months since the first period, rentals)`, ascending
    pub points: Vec<(i32, u64)>,
}

/// Months since year zero, the ordinal used for month offsets
#[allow(clippy::cast_possible_wrap)]
fn month_ordinal(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

impl TimeSeriesChart {
    /// Chart of the monthly series, labelled `Mon YYYY`
    pub fn from_monthly(series: &[MonthlyRentals]) -> Self {
        let (labels, points) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => {
                let start = month_ordinal(first.period_end);
                let end = month_ordinal(last.period_end);
                let labels = (start..=end)
                    .map(|ordinal| {
                        let month = (ordinal.rem_euclid(12) + 1).unsigned_abs();
                        format!("{} {}", month_abbr(month), ordinal.div_euclid(12))
                    })
                    .collect();
                let points = series
                    .iter()
                    .map(|point| (month_ordinal(point.period_end) - start, point.rentals))
                    .collect();
                (labels, points)
            }
            _ => (Vec::new(), Vec::new()),
        };

        Self {
            title: "Bike Rentals Over Time (Aggregated by Month)".to_string(),
            x_label: "Month".to_string(),
            y_label: RENTALS_AXIS_LABEL.to_string(),
            labels,
            points,
        }
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest value of the series
    pub fn peak(&self) -> u64 {
        self.points.iter().map(|(_, value)| *value).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::ExtremaRow;

    #[test]
    fn test_style_from_config() {
        let config = GraphConfig {
            width: 1600,
            show_values: false,
            ..GraphConfig::default()
        };
        let style = ChartStyle::from(&config);

        assert_eq!(style.width, 1600);
        assert_eq!(style.height, 600);
        assert_eq!(style.max_color, "#6499E9");
        assert_eq!(style.min_color, "#FFA500");
        assert!(!style.show_values);
    }

    #[test]
    fn test_extrema_chart_from_month_view() {
        let view = ExtremaView {
            dimension: Dimension::Month,
            rows: vec![
                ExtremaRow {
                    key: 1,
                    distinct_records: 31,
                    max_rentals: 4521,
                    min_rentals: 431,
                },
                ExtremaRow {
                    key: 2,
                    distinct_records: 28,
                    max_rentals: 5062,
                    min_rentals: 1005,
                },
            ],
        };

        let chart = ExtremaChart::from_view(&view);

        assert_eq!(chart.title, "Max and Min Bike Rentals per Month");
        assert_eq!(chart.x_label, "Month");
        assert_eq!(chart.y_label, RENTALS_AXIS_LABEL);
        assert_eq!(chart.categories, vec!["Jan", "Feb"]);
        assert_eq!(chart.max_values, vec![4521, 5062]);
        assert_eq!(chart.min_values, vec![431, 1005]);
        assert_eq!(chart.peak(), 5062);
    }

    #[test]
    fn test_extrema_chart_titles() {
        let empty = |dimension| ExtremaView {
            dimension,
            rows: Vec::new(),
        };

        let season = ExtremaChart::from_view(&empty(Dimension::Season));
        assert_eq!(season.title, "Max and Min Bike Rentals by Season");
        assert!(season.is_empty());
        assert_eq!(season.peak(), 0);

        assert_eq!(ExtremaChart::from_view(&empty(Dimension::Weekday)).x_label, "Day");
        assert_eq!(
            ExtremaChart::from_view(&empty(Dimension::Hour)).title,
            "Max and Min Bike Rentals per Hour"
        );
    }

    #[test]
    fn test_time_series_labels() {
        let series = vec![
            MonthlyRentals {
                period_end: NaiveDate::from_ymd_opt(2011, 1, 31).unwrap(),
                rentals: 38189,
            },
            MonthlyRentals {
                period_end: NaiveDate::from_ymd_opt(2011, 2, 28).unwrap(),
                rentals: 48215,
            },
        ];

        let chart = TimeSeriesChart::from_monthly(&series);

        assert_eq!(chart.title, "Bike Rentals Over Time (Aggregated by Month)");
        assert_eq!(chart.labels, vec!["Jan 2011", "Feb 2011"]);
        assert_eq!(chart.points, vec![(0, 38189), (1, 48215)]);
        assert_eq!(chart.peak(), 48215);
    }

    #[test]
    fn test_time_series_keeps_gaps_on_the_axis() {
        let series = vec![
            MonthlyRentals {
                period_end: NaiveDate::from_ymd_opt(2011, 11, 30).unwrap(),
                rentals: 10,
            },
            MonthlyRentals {
                period_end: NaiveDate::from_ymd_opt(2012, 2, 29).unwrap(),
                rentals: 40,
            },
        ];

        let chart = TimeSeriesChart::from_monthly(&series);

        assert_eq!(chart.labels, vec!["Nov 2011", "Dec 2011", "Jan 2012", "Feb 2012"]);
        assert_eq!(chart.points, vec![(0, 10), (3, 40)]);

        let empty = TimeSeriesChart::from_monthly(&[]);
        assert!(empty.is_empty());
        assert!(empty.labels.is_empty());
    }
}
