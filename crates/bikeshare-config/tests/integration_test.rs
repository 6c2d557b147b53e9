//! Integration tests for bikeshare-config.

use bikeshare_common::test_utils::init_test_logging;
use bikeshare_config::{Config, ConfigLoader};
use std::io::Write;

const EXAMPLE_CONFIG: &str = include_str!("../../../bikeshare.example.yaml");

#[test]
fn test_example_config_is_valid() {
    init_test_logging();

    let config: Config = serde_yaml::from_str(EXAMPLE_CONFIG).expect("example config must parse");
    config.validate_all().expect("example config must validate");

    assert_eq!(config.data.columns, bikeshare_common::ColumnMapping::default());
    assert_eq!(config.dashboard.author.as_deref(), Some("Reihan Septyawan"));
}

#[test]
fn test_example_config_loads_from_disk() {
    init_test_logging();

    let dir = bikeshare_common::test_utils::create_temp_dir();
    let path = dir.path().join("bikeshare.yaml");
    std::fs::File::create(&path)
        .and_then(|mut f| f.write_all(EXAMPLE_CONFIG.as_bytes()))
        .unwrap();

    let config = ConfigLoader::load_config_with_env(&path, |_| None).unwrap();
    assert_eq!(config.graph.width, 1000);
    assert_eq!(config.dashboard.output_dir, "dashboard");
}
