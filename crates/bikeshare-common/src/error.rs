//! Error types and utilities for the dashboard

use thiserror::Error;

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Main error type for dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited input could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by the dataset schema is absent from the header row
    #[error("Missing column '{column}' (required for {role})")]
    MissingColumn {
        /// Expected header name
        column: String,
        /// Record field the column feeds
        role: String,
    },

    /// A date cell could not be parsed as a calendar date
    #[error("Invalid date '{value}' on row {row}")]
    InvalidDate {
        /// 1-based data row
        row: usize,
        /// Raw cell text
        value: String,
    },

    /// A cell holds a value outside the domain of its column
    #[error("Invalid value '{value}' in column '{column}' on row {row}")]
    InvalidValue {
        /// 1-based data row
        row: usize,
        /// Header name of the cell
        column: String,
        /// Raw cell text
        value: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// What went wrong
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DashboardError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a missing column error for a schema role
    pub fn missing_column(column: impl Into<String>, role: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            role: role.into(),
        }
    }

    /// Create an invalid date error; `row` is 1-based and excludes the header
    pub fn invalid_date(row: usize, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            row,
            value: value.into(),
        }
    }

    /// Create an invalid value error; `row` is 1-based and excludes the header
    pub fn invalid_value(row: usize, column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            row,
            column: column.into(),
            value: value.into(),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error was raised by the dataset schema or row parser
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. } | Self::InvalidDate { .. } | Self::InvalidValue { .. }
        )
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to DashboardError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for DashboardError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = DashboardError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = DashboardError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("config issue"));

        let validation_error = DashboardError::validation_field("Invalid input", "width");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_input_error_display() {
        let missing = DashboardError::missing_column("cnt_x", "daily rental count");
        assert_eq!(
            missing.to_string(),
            "Missing column 'cnt_x' (required for daily rental count)"
        );

        let date = DashboardError::invalid_date(3, "2011-13-45");
        assert_eq!(date.to_string(), "Invalid date '2011-13-45' on row 3");

        let value = DashboardError::invalid_value(7, "season_x", "9");
        assert_eq!(
            value.to_string(),
            "Invalid value '9' in column 'season_x' on row 7"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(DashboardError::missing_column("hr", "hour").is_input_error());
        assert!(DashboardError::invalid_date(1, "x").is_input_error());
        assert!(DashboardError::invalid_value(1, "hr", "24").is_input_error());
        assert!(!DashboardError::graph("nope").is_input_error());
        assert!(!DashboardError::config("nope").is_input_error());
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped_error = DashboardError::with_source("Failed to read file", io_error);

        assert!(wrapped_error.to_string().contains("Failed to read file"));
        assert!(wrapped_error.source().is_some());

        let config_source_error = DashboardError::config_with_source(
            "Config loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );

        assert!(config_source_error.to_string().contains("Configuration error"));
        assert!(config_source_error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let dashboard_error: DashboardError = io_error.into();

        assert!(dashboard_error.to_string().contains("I/O error"));
        assert!(dashboard_error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"invalid": json}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let dashboard_error: DashboardError = serde_error.into();

        assert!(dashboard_error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error = DashboardError::config_with_source("Middle layer", root_error);
        let top_error = DashboardError::with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut error_count = 0;

        while let Some(source) = current_error.source() {
            current_error = source;
            error_count += 1;
        }

        assert_eq!(error_count, 2);
    }
}
