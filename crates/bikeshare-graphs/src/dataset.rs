//! Typed rental dataset and its delimited-file loader.
//!
//! The header row is checked once against the [`ColumnMapping`]; every row is
//! then parsed into a [`RentalRecord`] with its codes range-checked, so the
//! aggregators downstream never see a malformed value.

use bikeshare_common::{parse_date, ColumnMapping, DashboardError, Granularity, Result};
use bikeshare_config::DataConfig;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

const SEASON_RANGE: RangeInclusive<u8> = 1..=4;
const MONTH_RANGE: RangeInclusive<u8> = 1..=12;
const WEEKDAY_RANGE: RangeInclusive<u8> = 0..=6;
const HOUR_RANGE: RangeInclusive<u8> = 0..=23;

/// Largest rental count a single row may carry; keeps monthly sums far from `u64::MAX`
#[allow(clippy::cast_lossless)]
pub const MAX_RENTAL_COUNT: u64 = u32::MAX as u64;

/// A rental count attributed to one source row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Observation {
    /// Identifier of the source row the count belongs to
    pub record_id: u64,
    /// Number of rentals
    pub rental_count: u64,
}

/// An hour-granularity observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyObservation {
    /// Hour of day, 0-23
    pub hour: u8,
    /// Identifier of the hourly source row
    pub record_id: u64,
    /// Rentals during that hour
    pub rental_count: u64,
}

impl HourlyObservation {
    /// The id and count, without the hour
    pub const fn observation(&self) -> Observation {
        Observation {
            record_id: self.record_id,
            rental_count: self.rental_count,
        }
    }
}

/// One row of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RentalRecord {
    /// Calendar date
    pub date: NaiveDate,
    /// Season code, 1-4
    pub season: u8,
    /// Month, 1-12
    pub month: u8,
    /// Day of week, 0-6
    pub weekday: u8,
    /// Daily observation, present on every row
    pub daily: Observation,
    /// Hourly observation, present on hour-granularity rows only
    pub hourly: Option<HourlyObservation>,
}

impl RentalRecord {
    /// The observation this record contributes at `granularity`, if any
    pub fn observation(&self, granularity: Granularity) -> Option<Observation> {
        match granularity {
            Granularity::Daily => Some(self.daily),
            Granularity::Hourly => self.hourly.map(|h| h.observation()),
        }
    }
}

/// The loaded, date-ordered collection of rental records.
#[derive(Debug, Clone, Default)]
pub struct RentalDataset {
    records: Vec<RentalRecord>,
    source: String,
}

impl RentalDataset {
    /// Builds a dataset from already-typed records, sorting them by date.
    ///
    /// The sort is stable, so rows sharing a date keep their input order.
    pub fn new(mut records: Vec<RentalRecord>, source: impl Into<String>) -> Self {
        records.sort_by_key(|record| record.date);
        Self {
            records,
            source: source.into(),
        }
    }

    /// Loads a comma-delimited file using `columns`
    pub fn from_path(path: impl AsRef<Path>, columns: &ColumnMapping) -> Result<Self> {
        DatasetLoader::new(columns.clone()).load_path(path)
    }

    /// Loads comma-delimited data from any reader using `columns`
    pub fn from_reader<R: Read>(reader: R, columns: &ColumnMapping) -> Result<Self> {
        DatasetLoader::new(columns.clone()).load_reader(reader, "<reader>")
    }

    /// Records in ascending date order
    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    /// Where the records were read from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records carrying an hourly observation
    pub fn hourly_len(&self) -> usize {
        self.records.iter().filter(|r| r.hourly.is_some()).count()
    }

    /// First and last date covered
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }
}

/// Reads delimited rental data into a [`RentalDataset`].
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    columns: ColumnMapping,
    delimiter: u8,
}

impl DatasetLoader {
    /// Comma-delimited loader for `columns`
    pub const fn new(columns: ColumnMapping) -> Self {
        Self {
            columns,
            delimiter: b',',
        }
    }

    /// Use `delimiter` between fields
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Loader matching the `data` section of the configuration.
    ///
    /// Fails when the configured delimiter is not a single-byte character.
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter).map_err(|_| {
            DashboardError::validation_field(
                format!("Delimiter '{}' is not a single-byte character", config.delimiter),
                "data.delimiter",
            )
        })?;
        Ok(Self::new(config.columns.clone()).with_delimiter(delimiter))
    }

    /// Reads and parses the file at `path`
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<RentalDataset> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DashboardError::with_source(format!("Failed to open {}", path.display()), e)
        })?;
        self.load_reader(file, path.display().to_string())
    }

    /// Parses delimited data from `reader`; `source` names it in logs and the dataset
    #[instrument(skip_all)]
    pub fn load_reader<R: Read>(&self, reader: R, source: impl Into<String>) -> Result<RentalDataset> {
        let source = source.into();
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let schema = Schema::resolve(csv_reader.headers()?, &self.columns)?;
        debug!(source = %source, "Header row matches the column mapping");

        let mut records = Vec::new();
        for (index, row) in csv_reader.records().enumerate() {
            records.push(schema.parse_row(&row?, index + 1)?);
        }

        let dataset = RentalDataset::new(records, source);
        if dataset.is_empty() {
            warn!(
                source = %dataset.source(),
                "EmptyInputWarning: dataset has no rows, every view will be empty"
            );
        } else {
            info!(
                source = %dataset.source(),
                records = dataset.len(),
                hourly_records = dataset.hourly_len(),
                "Loaded rental dataset"
            );
        }
        Ok(dataset)
    }
}

/// Positions of every role's column in the header row.
struct Schema<'a> {
    columns: &'a ColumnMapping,
    date: usize,
    season: usize,
    month: usize,
    weekday: usize,
    hour: usize,
    daily_id: usize,
    daily_count: usize,
    hourly_id: usize,
    hourly_count: usize,
}

impl<'a> Schema<'a> {
    fn resolve(headers: &StringRecord, columns: &'a ColumnMapping) -> Result<Self> {
        let find = |name: &str, role: &str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or_else(|| DashboardError::missing_column(name, role))
        };

        Ok(Self {
            columns,
            date: find(&columns.date, "date")?,
            season: find(&columns.season, "season")?,
            month: find(&columns.month, "month")?,
            weekday: find(&columns.weekday, "weekday")?,
            hour: find(&columns.hour, "hour")?,
            daily_id: find(&columns.daily_id, "daily record id")?,
            daily_count: find(&columns.daily_count, "daily rental count")?,
            hourly_id: find(&columns.hourly_id, "hourly record id")?,
            hourly_count: find(&columns.hourly_count, "hourly rental count")?,
        })
    }

    fn parse_row(&self, row: &StringRecord, line: usize) -> Result<RentalRecord> {
        let cell = |index: usize| row.get(index).unwrap_or("");

        let raw_date = cell(self.date);
        let date = parse_date(raw_date).ok_or_else(|| DashboardError::invalid_date(line, raw_date))?;

        let code = |index: usize, column: &str, range: RangeInclusive<u8>| {
            let raw = cell(index);
            parse_code(raw, &range).ok_or_else(|| DashboardError::invalid_value(line, column, raw))
        };
        let count = |index: usize, column: &str| {
            let raw = cell(index);
            parse_count(raw).ok_or_else(|| DashboardError::invalid_value(line, column, raw))
        };
        let rentals = |index: usize, column: &str| {
            let raw = cell(index);
            parse_count(raw)
                .filter(|value| *value <= MAX_RENTAL_COUNT)
                .ok_or_else(|| DashboardError::invalid_value(line, column, raw))
        };

        let season = code(self.season, &self.columns.season, SEASON_RANGE)?;
        let month = code(self.month, &self.columns.month, MONTH_RANGE)?;
        let weekday = code(self.weekday, &self.columns.weekday, WEEKDAY_RANGE)?;
        let daily = Observation {
            record_id: count(self.daily_id, &self.columns.daily_id)?,
            rental_count: rentals(self.daily_count, &self.columns.daily_count)?,
        };

        let hourly_cells = [
            (self.hour, self.columns.hour.as_str()),
            (self.hourly_id, self.columns.hourly_id.as_str()),
            (self.hourly_count, self.columns.hourly_count.as_str()),
        ];
        let hourly = if hourly_cells.iter().all(|(index, _)| cell(*index).is_empty()) {
            None
        } else {
            if let Some((_, column)) = hourly_cells.iter().find(|(index, _)| cell(*index).is_empty()) {
                return Err(DashboardError::invalid_value(line, *column, ""));
            }
            Some(HourlyObservation {
                hour: code(self.hour, &self.columns.hour, HOUR_RANGE)?,
                record_id: count(self.hourly_id, &self.columns.hourly_id)?,
                rental_count: rentals(self.hourly_count, &self.columns.hourly_count)?,
            })
        };

        Ok(RentalRecord {
            date,
            season,
            month,
            weekday,
            daily,
            hourly,
        })
    }
}

/// Parses a non-negative integer cell, accepting a zero fraction such as `"3.0"`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().ok().or_else(|| {
        let value = raw.parse::<f64>().ok()?;
        (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64)
            .then(|| value as u64)
    })
}

fn parse_code(raw: &str, range: &RangeInclusive<u8>) -> Option<u8> {
    parse_count(raw)
        .and_then(|value| u8::try_from(value).ok())
        .filter(|value| range.contains(value))
}
