//! Configuration loading utilities

use crate::Config;
use bikeshare_common::Result as DashboardResult;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "BIKESHARE_CONFIG_PATH";

/// Configuration file names probed in the working directory
const DEFAULT_CONFIG_FILES: [&str; 2] = ["bikeshare.yaml", "bikeshare.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for bikeshare_common::DashboardError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with_env(path, |var| env::var(var).ok())
    }

    /// Like [`ConfigLoader::load_config`], reading overrides through `lookup`
    pub fn load_config_with_env<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config, &lookup)?;
        config.validate_all()?;

        debug!(path = %path.as_ref().display(), "Parsed configuration file");
        Ok(config)
    }

    /// The file [`ConfigLoader::load`] reads: the explicit path,
    /// `BIKESHARE_CONFIG_PATH`, or a `bikeshare.yaml`/`bikeshare.yml` in the
    /// working directory. `None` means defaults are used.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from))
            .or_else(|| {
                DEFAULT_CONFIG_FILES
                    .iter()
                    .map(Path::new)
                    .find(|candidate| candidate.exists())
                    .map(Path::to_path_buf)
            })
    }

    /// Load configuration from the file picked by [`ConfigLoader::resolve_path`],
    /// or defaults when there is none
    pub fn load(explicit: Option<&Path>) -> DashboardResult<Config> {
        match Self::resolve_path(explicit) {
            Some(path) => Ok(Self::load_config(path)?),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::defaults_with_env(|var| env::var(var).ok())?)
            }
        }
    }

    /// Default configuration with environment overrides applied
    pub fn defaults_with_env<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config, &lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("BIKESHARE_DATA_PATH") {
            config.data.path = path;
        }

        if let Some(dir) = lookup("BIKESHARE_OUTPUT_DIR") {
            config.dashboard.output_dir = dir;
        }

        if let Some(value) = parse_override(lookup, "BIKESHARE_WRITE_PNG")? {
            config.dashboard.write_png = value;
        }

        if let Some(value) = parse_override(lookup, "BIKESHARE_GRAPH_WIDTH")? {
            config.graph.width = value;
        }

        if let Some(value) = parse_override(lookup, "BIKESHARE_GRAPH_HEIGHT")? {
            config.graph.height = value;
        }

        if let Some(level) = lookup("BIKESHARE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = lookup("BIKESHARE_LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

/// Parses the variable `var` when it is set
fn parse_override<F, T>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: var.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Create a temporary YAML config file for testing
    fn create_test_config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    const FULL_YAML: &str = "data:\n  path: \"data/all_data.csv\"\n  delimiter: \";\"\n  columns:\n    date: \"day\"\n  time_series_granularity: hourly\ndashboard:\n  title: \"Rentals\"\n  author: \"Data Team\"\n  logo_url: \"https://example.com/logo.jpg\"\n  output_dir: \"out\"\n  write_png: true\n  write_json: false\ngraph:\n  width: 1200\n  height: 800\n  background_color: \"#FFFFFF\"\n  max_color: \"#6499E9\"\n  min_color: \"#FFA500\"\n  line_color: \"#000000\"\n  font_family: \"DejaVu Sans\"\n  font_size: 12\n  title_font_size: 20\n  show_grid: false\n  show_values: true\nlogging:\n  level: \"debug\"\n  format: json\n  include_spans: true";

    #[test]
    fn test_load_valid_yaml_config() {
        let temp_file = create_test_config_file(FULL_YAML);
        let config = ConfigLoader::load_config_with_env(temp_file.path(), env_from(&[]))
            .expect("Failed to load config");

        assert_eq!(config.data.path, "data/all_data.csv");
        assert_eq!(config.data.delimiter, ';');
        assert_eq!(config.data.columns.date, "day");
        assert_eq!(config.data.columns.season, "season_x");
        assert_eq!(
            config.data.time_series_granularity,
            bikeshare_common::Granularity::Hourly
        );
        assert_eq!(config.dashboard.author.as_deref(), Some("Data Team"));
        assert!(config.dashboard.write_png);
        assert_eq!(config.graph.width, 1200);
        assert!(!config.graph.show_grid);
        assert_eq!(config.logging.format, bikeshare_common::LogFormat::Json);
    }

    #[test]
    fn test_load_minimal_config() {
        let temp_file = create_test_config_file("dashboard:\n  author: \"Reihan\"\n");
        let config = ConfigLoader::load_config_with_env(temp_file.path(), env_from(&[]))
            .expect("Failed to load config");

        assert_eq!(config.dashboard.author.as_deref(), Some("Reihan"));
        assert_eq!(config.dashboard.title, "Dashboard Rent Bike");
        assert_eq!(config.graph.width, 1000);
    }

    #[test]
    fn test_invalid_yaml() {
        let temp_file = create_test_config_file("graph:\n  width: [unclosed array");
        let result = ConfigLoader::load_config_with_env(temp_file.path(), env_from(&[]));

        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_error() {
        let temp_file = create_test_config_file("graph:\n  max_color: \"blue\"\n");
        let result = ConfigLoader::load_config_with_env(temp_file.path(), env_from(&[]));

        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_environment_variable_overrides() {
        let temp_file = create_test_config_file(FULL_YAML);
        let env = env_from(&[
            ("BIKESHARE_DATA_PATH", "/srv/bike/hour.csv"),
            ("BIKESHARE_OUTPUT_DIR", "/srv/www"),
            ("BIKESHARE_GRAPH_WIDTH", "1500"),
            ("BIKESHARE_WRITE_PNG", "false"),
            ("BIKESHARE_LOG_LEVEL", "warn"),
            ("BIKESHARE_LOG_FILE", "logs/run.log"),
        ]);
        let config =
            ConfigLoader::load_config_with_env(temp_file.path(), env).expect("Failed to load config");

        assert_eq!(config.data.path, "/srv/bike/hour.csv");
        assert_eq!(config.dashboard.output_dir, "/srv/www");
        assert_eq!(config.graph.width, 1500);
        assert!(!config.dashboard.write_png);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.file.as_deref(), Some("logs/run.log"));
    }

    #[test]
    fn test_env_override_is_validated() {
        let result = ConfigLoader::defaults_with_env(env_from(&[("BIKESHARE_GRAPH_HEIGHT", "20")]));
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_parse_error() {
        let temp_file = create_test_config_file(FULL_YAML);
        let result = ConfigLoader::load_config_with_env(
            temp_file.path(),
            env_from(&[("BIKESHARE_GRAPH_WIDTH", "not_a_number")]),
        );

        match result.unwrap_err() {
            ConfigError::EnvParseError { var, .. } => assert_eq!(var, "BIKESHARE_GRAPH_WIDTH"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_config_file() {
        let result = ConfigLoader::load_config("/nonexistent/path/bikeshare.yaml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_explicit_path_takes_precedence() {
        let temp_file = create_test_config_file("dashboard:\n  title: \"Explicit\"\n");
        let config = ConfigLoader::load(Some(temp_file.path())).expect("Failed to load config");
        assert_eq!(config.dashboard.title, "Explicit");
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let temp_file = create_test_config_file("dashboard:\n  title: \"Explicit\"\n");
        assert_eq!(
            ConfigLoader::resolve_path(Some(temp_file.path())),
            Some(temp_file.path().to_path_buf())
        );
    }

    #[test]
    fn test_config_error_converts_to_dashboard_error() {
        let err: bikeshare_common::DashboardError =
            ConfigLoader::load_config("/nonexistent/bikeshare.yaml")
                .unwrap_err()
                .into();
        assert!(err.to_string().contains("Configuration error"));
    }
}
