//! Configuration management for the bike rental dashboard

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{Config, DashboardConfig, DataConfig, GraphConfig, LoggingConfig};
