//! Integration tests for bikeshare-graphs.
//!
//! Load a rental CSV from disk, derive the dashboard views and write the page.

use bikeshare_common::test_utils::rental_fixtures::{sample_rows, to_csv};
use bikeshare_common::test_utils::{create_temp_dir, init_test_logging};
use bikeshare_common::{ColumnMapping, Granularity};
use bikeshare_graphs::{
    ChartStyle, DashboardManager, DashboardSettings, DashboardViews, DatasetLoader, RentalDataset,
    INDEX_FILE,
};
use chrono::NaiveDate;

fn write_sample(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("all_data.csv");
    std::fs::write(&path, to_csv(&sample_rows())).unwrap();
    path
}

#[test]
fn test_sample_file_views() {
    init_test_logging();
    let dir = create_temp_dir();
    let dataset = RentalDataset::from_path(write_sample(dir.path()), &ColumnMapping::default()).unwrap();

    let views = DashboardViews::compute(&dataset, Granularity::Daily);

    let monthly: Vec<_> = views.monthly.iter().map(|m| (m.period_end, m.rentals)).collect();
    assert_eq!(
        monthly,
        vec![
            (NaiveDate::from_ymd_opt(2011, 1, 31).unwrap(), 3572),
            (NaiveDate::from_ymd_opt(2011, 3, 31).unwrap(), 2825),
        ]
    );

    let season_1 = views.by_season.row(1).unwrap();
    assert_eq!((season_1.distinct_records, season_1.max_rentals, season_1.min_rentals), (2, 985, 801));
    let season_2 = views.by_season.row(2).unwrap();
    assert_eq!((season_2.distinct_records, season_2.max_rentals, season_2.min_rentals), (2, 2077, 748));

    assert_eq!(views.by_month.rows.iter().map(|r| r.key).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(views.by_weekday.rows.iter().map(|r| r.key).collect::<Vec<_>>(), vec![0, 1, 2, 6]);

    let hour_0 = views.by_hour.row(0).unwrap();
    assert_eq!((hour_0.distinct_records, hour_0.max_rentals, hour_0.min_rentals), (2, 17, 16));
    assert_eq!(views.by_hour.row(8).map(|r| r.max_rentals), Some(210));
    assert_eq!(views.by_hour.rows.len(), 3);
}

#[test]
fn test_hourly_series_granularity() {
    init_test_logging();
    let dir = create_temp_dir();
    let dataset = RentalDataset::from_path(write_sample(dir.path()), &ColumnMapping::default()).unwrap();

    let views = DashboardViews::compute(&dataset, Granularity::Hourly);

    let totals: Vec<_> = views.monthly.iter().map(|m| m.rentals).collect();
    assert_eq!(totals, vec![16 + 40 + 17 + 17, 210]);
}

#[test]
fn test_loader_from_config() {
    init_test_logging();
    let dir = create_temp_dir();
    let path = dir.path().join("semicolon.csv");
    std::fs::write(&path, to_csv(&sample_rows()).replace(',', ";")).unwrap();

    let mut config = bikeshare_config::Config::default();
    config.data.delimiter = ';';

    let dataset = DatasetLoader::from_config(&config.data)
        .unwrap()
        .load_path(&path)
        .unwrap();
    assert_eq!(dataset.len(), 6);
}

#[tokio::test]
async fn test_failed_run_leaves_no_page() {
    init_test_logging();
    let dir = create_temp_dir();
    let blocker = dir.path().join("site");
    std::fs::write(&blocker, "not a directory").unwrap();

    let settings = DashboardSettings {
        output_dir: blocker.clone(),
        ..DashboardSettings::default()
    };
    let manager = DashboardManager::new(ChartStyle::default(), settings);
    let views = DashboardViews::compute(&RentalDataset::default(), Granularity::Daily);

    assert!(manager.generate(&views).await.is_err());
    assert!(!blocker.join(INDEX_FILE).exists());
}

#[tokio::test]
#[ignore = "requires system fonts"]
async fn test_full_dashboard_with_png() {
    init_test_logging();
    let dir = create_temp_dir();
    let dataset = RentalDataset::from_path(write_sample(dir.path()), &ColumnMapping::default()).unwrap();
    let views = DashboardViews::compute(&dataset, Granularity::Daily);

    let settings = DashboardSettings {
        author: Some("Reihan Septyawan".to_string()),
        output_dir: dir.path().join("site"),
        write_png: true,
        ..DashboardSettings::default()
    };
    let report = DashboardManager::new(ChartStyle::default(), settings)
        .generate(&views)
        .await
        .unwrap();

    assert!(report.empty_sections.is_empty());
    assert_eq!(report.png_paths.len(), 5);
    for png in &report.png_paths {
        assert!(png.exists());
    }

    let html = std::fs::read_to_string(&report.index_path).unwrap();
    assert_eq!(html.matches("<svg").count(), 5);
    assert!(html.contains("Bike Rentals by Day of the Week"));
    assert!(html.contains("Season 2"));
    assert!(html.contains("Jan 2011"));
}
