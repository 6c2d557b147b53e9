//! Application-wide error types using thiserror.

use bikeshare_common::DashboardError;
use bikeshare_config::ConfigError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Loading, aggregation or rendering failed.
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl AppError {
    /// Whether the failure came from the input dataset rather than the environment
    pub const fn is_input_error(&self) -> bool {
        match self {
            Self::Dashboard(err) => err.is_input_error(),
            Self::Config(_) => false,
        }
    }
}

/// Result type for the dashboard application.
pub type AppResult<T> = Result<T, AppError>;
