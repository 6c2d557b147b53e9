//! Test utilities and shared test helpers for the dashboard workspace.
//!
//! Provides a once-only test logger and fixtures that build rental CSV
//! documents in the default merged daily/hourly layout.

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "testing")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Rental CSV fixtures.
pub mod rental_fixtures {
    use std::fmt::Write as _;

    /// Header row of the default merged daily/hourly export.
    pub const HEADER: &str =
        "instant_x,dteday,season_x,mnth_x,weekday_x,cnt_x,instant_y,hr,cnt_y";

    /// One row of a rental CSV fixture.
    #[derive(Debug, Clone)]
    pub struct FixtureRow {
        /// Date cell, written verbatim.
        pub date: String,
        /// Season code.
        pub season: u8,
        /// Month code.
        pub month: u8,
        /// Weekday code.
        pub weekday: u8,
        /// Daily record id.
        pub daily_id: u64,
        /// Daily rental count.
        pub daily_count: u64,
        /// Hourly `(record id, hour, rental count)`; blank cells when `None`.
        pub hourly: Option<(u64, u8, u64)>,
    }

    impl FixtureRow {
        /// Daily-only row.
        pub fn daily(date: &str, season: u8, month: u8, weekday: u8, id: u64, count: u64) -> Self {
            Self {
                date: date.to_string(),
                season,
                month,
                weekday,
                daily_id: id,
                daily_count: count,
                hourly: None,
            }
        }

        /// Attach an hourly observation to the row.
        #[must_use]
        pub fn with_hourly(mut self, id: u64, hour: u8, count: u64) -> Self {
            self.hourly = Some((id, hour, count));
            self
        }
    }

    /// Render rows as a CSV document with [`HEADER`].
    pub fn to_csv(rows: &[FixtureRow]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for row in rows {
            let (hourly_id, hour, hourly_count) = match row.hourly {
                Some((id, hour, count)) => (id.to_string(), hour.to_string(), count.to_string()),
                None => (String::new(), String::new(), String::new()),
            };
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{},{}",
                row.daily_id,
                row.date,
                row.season,
                row.month,
                row.weekday,
                row.daily_count,
                hourly_id,
                hour,
                hourly_count
            );
        }
        out
    }

    /// A small dataset spanning two months, two seasons and a few hours.
    pub fn sample_rows() -> Vec<FixtureRow> {
        vec![
            FixtureRow::daily("2011-01-01", 1, 1, 6, 1, 985).with_hourly(1, 0, 16),
            FixtureRow::daily("2011-01-01", 1, 1, 6, 1, 985).with_hourly(2, 1, 40),
            FixtureRow::daily("2011-01-02", 1, 1, 0, 2, 801).with_hourly(25, 0, 17),
            FixtureRow::daily("2011-01-02", 1, 1, 0, 2, 801).with_hourly(26, 1, 17),
            FixtureRow::daily("2011-03-21", 2, 3, 1, 80, 2077).with_hourly(1800, 8, 210),
            FixtureRow::daily("2011-03-22", 2, 3, 2, 81, 748),
        ]
    }
}
