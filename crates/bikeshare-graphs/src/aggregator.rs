//! Aggregation pipeline.
//!
//! Every aggregator is a pure function of an immutable [`RentalDataset`]:
//! no I/O, no hidden state, and the same input always yields the same output.

use crate::dataset::{RentalDataset, RentalRecord};
use bikeshare_common::{month_abbr, month_end, Granularity};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, info, instrument};

/// Trait for deriving a summary view from a rental dataset
pub trait RentalAggregator {
    /// The view produced
    type Output;

    /// Derive the view from `dataset`
    fn aggregate(&self, dataset: &RentalDataset) -> Self::Output;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Rentals summed over one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyRentals {
    /// Last day of the month
    pub period_end: NaiveDate,
    /// Sum of the rental counts observed in the month
    pub rentals: u64,
}

/// Sums rental counts per calendar month.
///
/// Months without records are absent from the output rather than zero-filled.
/// Loaded counts are capped at [`crate::dataset::MAX_RENTAL_COUNT`]; sums over hand-built
/// records saturate at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyRentalsAggregator {
    /// Which observation is summed; hourly skips daily-only records
    pub granularity: Granularity,
}

impl MonthlyRentalsAggregator {
    /// Aggregator summing observations at `granularity`
    pub const fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }
}

impl RentalAggregator for MonthlyRentalsAggregator {
    type Output = Vec<MonthlyRentals>;

    #[instrument(skip_all, fields(granularity = %self.granularity))]
    fn aggregate(&self, dataset: &RentalDataset) -> Self::Output {
        let mut months: BTreeMap<NaiveDate, u64> = BTreeMap::new();

        for record in dataset.records() {
            if let Some(observation) = record.observation(self.granularity) {
                let total = months.entry(month_end(record.date)).or_insert(0);
                *total = total.saturating_add(observation.rental_count);
            }
        }

        debug!(months = months.len(), "Aggregated monthly rentals");

        months
            .into_iter()
            .map(|(period_end, rentals)| MonthlyRentals { period_end, rentals })
            .collect()
    }

    fn name(&self) -> &'static str {
        "monthly_rentals"
    }
}

/// Grouping key of an extrema view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Season code 1-4
    Season,
    /// Calendar month 1-12
    Month,
    /// Day of week 0-6
    Weekday,
    /// Hour of day 0-23
    Hour,
}

impl Dimension {
    /// Every dimension, in dashboard order
    pub const ALL: [Self; 4] = [Self::Season, Self::Month, Self::Weekday, Self::Hour];

    /// Observation granularity compared within a group
    pub const fn granularity(self) -> Granularity {
        match self {
            Self::Hour => Granularity::Hourly,
            Self::Season | Self::Month | Self::Weekday => Granularity::Daily,
        }
    }

    /// Key of `record`, `None` when the record has no value for this dimension
    pub fn key(self, record: &RentalRecord) -> Option<u8> {
        match self {
            Self::Season => Some(record.season),
            Self::Month => Some(record.month),
            Self::Weekday => Some(record.weekday),
            Self::Hour => record.hourly.map(|h| h.hour),
        }
    }

    /// Display label of a key
    pub fn category_label(self, key: u8) -> String {
        match self {
            Self::Season => format!("Season {key}"),
            Self::Month => month_abbr(u32::from(key)).to_string(),
            Self::Weekday | Self::Hour => key.to_string(),
        }
    }

    /// Identifier used for file names
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Season => "season",
            Self::Month => "month",
            Self::Weekday => "weekday",
            Self::Hour => "hour",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Summary of one group of an extrema view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtremaRow {
    /// Group key
    pub key: u8,
    /// Number of distinct record identifiers in the group
    pub distinct_records: usize,
    /// Largest rental count in the group
    pub max_rentals: u64,
    /// Smallest rental count in the group
    pub min_rentals: u64,
}

/// Per-key count, max and min, ascending by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtremaView {
    /// Grouping key
    pub dimension: Dimension,
    /// One row per key present in the input
    pub rows: Vec<ExtremaRow>,
}

impl ExtremaView {
    /// Whether no group was found
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `key`
    pub fn row(&self, key: u8) -> Option<&ExtremaRow> {
        self.rows
            .binary_search_by_key(&key, |row| row.key)
            .ok()
            .map(|index| &self.rows[index])
    }
}

struct Group {
    ids: HashSet<u64>,
    max: u64,
    min: u64,
}

/// Groups records by a [`Dimension`] and reports count, max and min per group.
#[derive(Debug, Clone, Copy)]
pub struct ExtremaAggregator {
    /// Grouping key
    pub dimension: Dimension,
}

impl ExtremaAggregator {
    /// Aggregator grouping by `dimension`
    pub const fn new(dimension: Dimension) -> Self {
        Self { dimension }
    }
}

impl RentalAggregator for ExtremaAggregator {
    type Output = ExtremaView;

    #[instrument(skip_all, fields(dimension = %self.dimension))]
    fn aggregate(&self, dataset: &RentalDataset) -> Self::Output {
        let granularity = self.dimension.granularity();
        let mut groups: BTreeMap<u8, Group> = BTreeMap::new();

        for record in dataset.records() {
            let (Some(key), Some(observation)) =
                (self.dimension.key(record), record.observation(granularity))
            else {
                continue;
            };

            let group = groups.entry(key).or_insert_with(|| Group {
                ids: HashSet::new(),
                max: observation.rental_count,
                min: observation.rental_count,
            });
            group.ids.insert(observation.record_id);
            group.max = group.max.max(observation.rental_count);
            group.min = group.min.min(observation.rental_count);
        }

        debug!(groups = groups.len(), "Aggregated extrema view");

        ExtremaView {
            dimension: self.dimension,
            rows: groups
                .into_iter()
                .map(|(key, group)| ExtremaRow {
                    key,
                    distinct_records: group.ids.len(),
                    max_rentals: group.max,
                    min_rentals: group.min,
                })
                .collect(),
        }
    }

    fn name(&self) -> &'static str {
        match self.dimension {
            Dimension::Season => "extrema_by_season",
            Dimension::Month => "extrema_by_month",
            Dimension::Weekday => "extrema_by_weekday",
            Dimension::Hour => "extrema_by_hour",
        }
    }
}

/// The five views shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardViews {
    /// Rentals per calendar month
    pub monthly: Vec<MonthlyRentals>,
    /// Extrema by season
    pub by_season: ExtremaView,
    /// Extrema by month
    pub by_month: ExtremaView,
    /// Extrema by day of week
    pub by_weekday: ExtremaView,
    /// Extrema by hour of day
    pub by_hour: ExtremaView,
}

impl DashboardViews {
    /// Computes every view from `dataset`, summing `series_granularity`
    /// observations in the monthly series
    #[instrument(skip_all, fields(records = dataset.len()))]
    pub fn compute(dataset: &RentalDataset, series_granularity: Granularity) -> Self {
        let extrema = |dimension| ExtremaAggregator::new(dimension).aggregate(dataset);

        let views = Self {
            monthly: MonthlyRentalsAggregator::new(series_granularity).aggregate(dataset),
            by_season: extrema(Dimension::Season),
            by_month: extrema(Dimension::Month),
            by_weekday: extrema(Dimension::Weekday),
            by_hour: extrema(Dimension::Hour),
        };

        info!(
            months = views.monthly.len(),
            seasons = views.by_season.rows.len(),
            hours = views.by_hour.rows.len(),
            "Computed dashboard views"
        );
        views
    }

    /// The extrema views in dashboard order
    pub const fn extrema_views(&self) -> [&ExtremaView; 4] {
        [&self.by_season, &self.by_month, &self.by_weekday, &self.by_hour]
    }

    /// Whether every view is empty
    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty() && self.extrema_views().iter().all(|view| view.is_empty())
    }
}
