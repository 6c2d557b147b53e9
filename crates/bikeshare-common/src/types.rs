//! Common type definitions shared by the loader, the aggregators and the config.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time resolution of a rental observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One observation per calendar day.
    #[default]
    Daily,
    /// One observation per hour of a day.
    Hourly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Hourly => write!(f, "hourly"),
        }
    }
}

/// Header names of the columns backing each role of a rental record.
///
/// The defaults match the merged daily/hourly export where daily columns
/// carry an `_x` suffix and hourly columns a `_y` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// Calendar date of the observation.
    pub date: String,
    /// Season code (1-4).
    pub season: String,
    /// Month code (1-12).
    pub month: String,
    /// Day-of-week code (0-6).
    pub weekday: String,
    /// Hour-of-day code (0-23), hourly rows only.
    pub hour: String,
    /// Unique identifier of the daily source row.
    pub daily_id: String,
    /// Rentals recorded for the day.
    pub daily_count: String,
    /// Unique identifier of the hourly source row.
    pub hourly_id: String,
    /// Rentals recorded for the hour.
    pub hourly_count: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date: "dteday".to_string(),
            season: "season_x".to_string(),
            month: "mnth_x".to_string(),
            weekday: "weekday_x".to_string(),
            hour: "hr".to_string(),
            daily_id: "instant_x".to_string(),
            daily_count: "cnt_x".to_string(),
            hourly_id: "instant_y".to_string(),
            hourly_count: "cnt_y".to_string(),
        }
    }
}

impl ColumnMapping {
    /// Every `(role, header)` pair, in schema order.
    pub fn roles(&self) -> [(&'static str, &str); 9] {
        [
            ("date", self.date.as_str()),
            ("season", self.season.as_str()),
            ("month", self.month.as_str()),
            ("weekday", self.weekday.as_str()),
            ("hour", self.hour.as_str()),
            ("daily record id", self.daily_id.as_str()),
            ("daily rental count", self.daily_count.as_str()),
            ("hourly record id", self.hourly_id.as_str()),
            ("hourly rental count", self.hourly_count.as_str()),
        ]
    }
}
