//! Application configuration structures

use bikeshare_common::{ColumnMapping, Granularity, LogFormat};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Input dataset settings
    #[validate]
    pub data: DataConfig,

    /// Dashboard page and output settings
    #[validate]
    pub dashboard: DashboardConfig,

    /// Chart rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// Input dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the delimited rental file
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Data path must be a non-empty valid path"))]
    pub path: String,

    /// Field delimiter
    pub delimiter: char,

    /// Header names backing each record role
    pub columns: ColumnMapping,

    /// Which rental count the monthly time series sums
    pub time_series_granularity: Granularity,
}

/// Dashboard page configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sidebar header
    #[validate(length(min = 1, message = "Dashboard title cannot be empty"))]
    pub title: String,

    /// Sidebar subheader, shown as "by <author>"
    pub author: Option<String>,

    /// Sidebar logo image
    #[validate(url(message = "Logo URL must be a valid URL"))]
    pub logo_url: Option<String>,

    /// Directory receiving index.html and the chart files
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Output directory must be a non-empty valid path"))]
    pub output_dir: String,

    /// Also write every chart as a PNG file
    pub write_png: bool,

    /// Also write the computed views as views.json
    pub write_json: bool,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Color of the max bars (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Max color must be valid hex color"))]
    pub max_color: String,

    /// Color of the min bars (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Min color must be valid hex color"))]
    pub min_color: String,

    /// Color of the time series line (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Line color must be valid hex color"))]
    pub line_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size for axis and value labels
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Font size for chart titles
    #[validate(range(min = 8, max = 96, message = "Title font size must be between 8 and 96"))]
    pub title_font_size: u32,

    /// Whether to show grid lines
    pub show_grid: bool,

    /// Whether to print the value above each bar
    pub show_values: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(function = "crate::validation::validate_log_level", message = "Log level must be one of: trace, debug, info, warn, error"))]
    pub level: String,

    /// Line format
    pub format: LogFormat,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to log span open/close events
    pub include_spans: bool,
}

impl Config {
    /// Comprehensive validation of the entire configuration
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.data.validate_input()?;
        Ok(())
    }
}

impl DataConfig {
    /// Checks the delimiter and the column mapping, which the derive cannot express
    pub fn validate_input(&self) -> Result<(), validator::ValidationErrors> {
        let mut errors = validator::ValidationErrors::new();

        if let Err(err) = crate::validation::validate_delimiter(self.delimiter) {
            errors.add("delimiter", err);
        }

        if let Err(err) = crate::validation::validate_column_mapping(&self.columns) {
            errors.add("columns", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "all_data.csv".to_string(),
            delimiter: ',',
            columns: ColumnMapping::default(),
            time_series_granularity: Granularity::Daily,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Dashboard Rent Bike".to_string(),
            author: None,
            logo_url: None,
            output_dir: "dashboard".to_string(),
            write_png: false,
            write_json: true,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background_color: "#EAEAF2".to_string(),
            max_color: "#6499E9".to_string(),
            min_color: "#FFA500".to_string(),
            line_color: "#6499E9".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            title_font_size: 18,
            show_grid: true,
            show_values: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            file: None,
            include_spans: false,
        }
    }
}

impl LoggingConfig {
    /// Settings for `bikeshare_common::init_logging`
    pub fn to_logging_config(&self) -> bikeshare_common::LoggingConfig {
        bikeshare_common::LoggingConfig {
            level: self.level.clone(),
            format: self.format,
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            ..bikeshare_common::LoggingConfig::default()
        }
    }
}
