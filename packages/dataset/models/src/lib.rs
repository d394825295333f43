#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Earthquake row types, query parameter definitions, and aggregate shapes.
//!
//! These types describe the prepared in-memory table and everything the
//! query layer hands to the chart builders. They carry no loading or
//! filtering logic; that lives in `quake_map_dataset`.

use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use quake_map_quake_models::MagnitudeCategory;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// A prepared earthquake event.
///
/// All derived fields are computed once in [`EarthquakeRecord::new`] and the
/// record is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    /// Unique event identifier.
    pub id: String,
    /// Origin time of the event.
    pub time: DateTime<Utc>,
    /// Calendar year of `time`.
    pub year: i32,
    /// Calendar month of `time` (1-12).
    pub month: u32,
    /// Day of month of `time` (1-31).
    pub day: u32,
    /// Epicenter latitude (WGS84).
    pub latitude: f64,
    /// Epicenter longitude (WGS84).
    pub longitude: f64,
    /// Event magnitude.
    pub magnitude: f64,
    /// Hypocenter depth in kilometers.
    pub depth: f64,
    /// Free-text location description.
    pub place: String,
    /// Country token extracted from `place`, if any.
    pub country: Option<String>,
    /// Coarse severity bucket derived from `magnitude`.
    pub magnitude_category: MagnitudeCategory,
}

impl EarthquakeRecord {
    /// Builds a record and derives the calendar, category, and country
    /// fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        time: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        magnitude: f64,
        depth: f64,
        place: impl Into<String>,
    ) -> Self {
        let place = place.into();
        Self {
            id: id.into(),
            year: time.year(),
            month: time.month(),
            day: time.day(),
            time,
            latitude,
            longitude,
            magnitude,
            depth,
            country: country_from_place(&place),
            magnitude_category: MagnitudeCategory::from_magnitude(magnitude),
            place,
        }
    }

    /// Calendar date of the event (UTC).
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.time.date_naive()
    }
}

/// Extracts a best-effort country name from a place description.
///
/// Takes the last comma-separated segment (`"45 km SW of Tokyo, Japan"` →
/// `"Japan"`), trims it, and strips a trailing `" region"`
/// (`"Fiji region"` → `"Fiji"`). Returns `None` for blank input.
#[must_use]
pub fn country_from_place(place: &str) -> Option<String> {
    let token = place.rsplit(',').next().unwrap_or("").trim();
    let token = token
        .strip_suffix(" region")
        .or_else(|| token.strip_suffix(" Region"))
        .unwrap_or(token)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Inclusive calendar-year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year included.
    pub min: i32,
    /// Last year included.
    pub max: i32,
}

impl YearRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub const fn new(a: i32, b: i32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Whether `year` lies within the range.
    #[must_use]
    pub const fn contains(&self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Inclusive magnitude range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagnitudeRange {
    /// Smallest magnitude included.
    pub min: f64,
    /// Largest magnitude included.
    pub max: f64,
}

impl MagnitudeRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Whether `magnitude` lies within the range.
    #[must_use]
    pub fn contains(&self, magnitude: f64) -> bool {
        magnitude >= self.min && magnitude <= self.max
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date included.
    pub from: NaiveDate,
    /// Last date included.
    pub to: NaiveDate,
}

impl DateRange {
    /// Whether `date` lies within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

/// Per-query filter parameters. Absent fields do not constrain the result.
///
/// All present predicates are combined conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Exact calendar year.
    pub year: Option<i32>,
    /// Inclusive year range.
    pub year_range: Option<YearRange>,
    /// Calendar month (1-12).
    pub month: Option<u32>,
    /// Case-insensitive substring matched against the place field.
    pub country: Option<String>,
    /// Inclusive magnitude range.
    pub magnitude_range: Option<MagnitudeRange>,
    /// Magnitude category.
    pub category: Option<MagnitudeCategory>,
    /// Inclusive calendar-date window.
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// Criteria that match every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to a single year.
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Restricts to an inclusive year range.
    #[must_use]
    pub const fn with_year_range(mut self, min: i32, max: i32) -> Self {
        self.year_range = Some(YearRange::new(min, max));
        self
    }

    /// Restricts to a calendar month.
    #[must_use]
    pub const fn with_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Restricts to places containing `country` (case-insensitive).
    ///
    /// A blank string leaves the criteria unconstrained.
    #[must_use]
    pub fn with_country(mut self, country: &str) -> Self {
        let trimmed = country.trim();
        self.country = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Restricts to an inclusive magnitude range.
    #[must_use]
    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Self {
        self.magnitude_range = Some(MagnitudeRange::new(min, max));
        self
    }

    /// Restricts to a magnitude category.
    #[must_use]
    pub const fn with_category(mut self, category: MagnitudeCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts to an inclusive date window.
    #[must_use]
    pub const fn with_date_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_range = Some(DateRange { from, to });
        self
    }

    /// Whether no predicate is set.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.year.is_none()
            && self.year_range.is_none()
            && self.month.is_none()
            && self.country.is_none()
            && self.magnitude_range.is_none()
            && self.category.is_none()
            && self.date_range.is_none()
    }
}

/// Month selector from the time-series view: a whole year or one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonthSelection {
    /// Every month of the selected year.
    All,
    /// A single calendar month (1-12).
    Month(u32),
}

impl std::str::FromStr for MonthSelection {
    type Err = InvalidMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match s.parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => Ok(Self::Month(m)),
            _ => Err(InvalidMonthError {
                value: s.to_string(),
            }),
        }
    }
}

/// Error returned when a month selector is neither `"all"` nor 1-12.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{value}': expected \"all\" or 1-12")]
pub struct InvalidMonthError {
    /// The rejected input.
    pub value: String,
}

/// Time-bucket size used when aggregating a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeGranularity {
    /// One bucket per calendar day.
    Day,
    /// One bucket per calendar month.
    Month,
}

impl TimeGranularity {
    /// Daily buckets when a specific month is requested, monthly otherwise.
    #[must_use]
    pub const fn for_criteria(criteria: &FilterCriteria) -> Self {
        if criteria.month.is_some() {
            Self::Day
        } else {
            Self::Month
        }
    }

    /// First date of the bucket containing `date`.
    #[must_use]
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

/// One bucket of an [`AggregatedSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// First date of the bucket.
    pub period: NaiveDate,
    /// Number of events in the bucket.
    pub count: u64,
    /// Mean magnitude of the events in the bucket.
    pub average_magnitude: f64,
}

/// Chronologically ordered time series. Empty buckets are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedSeries {
    /// Bucket size.
    pub granularity: TimeGranularity,
    /// Non-empty buckets in ascending period order.
    pub points: Vec<SeriesPoint>,
}

impl AggregatedSeries {
    /// A series with no buckets.
    #[must_use]
    pub const fn empty(granularity: TimeGranularity) -> Self {
        Self {
            granularity,
            points: Vec::new(),
        }
    }

    /// Whether the series has no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Metric selector for the per-country risk summary.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RiskMetric {
    /// Number of events.
    #[default]
    Count,
    /// Mean magnitude.
    AvgMagnitude,
    /// Largest magnitude.
    MaxMagnitude,
}

impl RiskMetric {
    /// Title-cased label (`"Avg Magnitude"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Count => "Count",
            Self::AvgMagnitude => "Avg Magnitude",
            Self::MaxMagnitude => "Max Magnitude",
        }
    }
}

/// Per-country aggregate used for choropleth display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummaryRow {
    /// Extracted country name.
    pub country: String,
    /// Number of events.
    pub count: u64,
    /// Mean magnitude.
    pub avg_magnitude: f64,
    /// Largest magnitude.
    pub max_magnitude: f64,
    /// Selected metric normalized to `[0, 1]`.
    pub value: f64,
}

/// Equal-width magnitude histogram bin, `[start, end)` except for the last
/// bin which also includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagnitudeHistogramBin {
    /// Lower edge.
    pub start: f64,
    /// Upper edge.
    pub end: f64,
    /// Number of events in the bin.
    pub count: u64,
}

/// Row accounting from a dataset load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Data rows encountered (excluding the header).
    pub rows_read: u64,
    /// Rows kept after preparation.
    pub rows_kept: u64,
    /// Rows dropped because the timestamp did not parse.
    pub dropped_timestamp: u64,
    /// Rows dropped because a numeric column did not parse.
    pub dropped_numeric: u64,
    /// Rows dropped because the CSV record itself was malformed or had no
    /// identifier.
    pub dropped_malformed: u64,
    /// Rows dropped because their identifier was already seen.
    pub dropped_duplicate: u64,
}

impl LoadReport {
    /// Total dropped rows.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped_timestamp + self.dropped_numeric + self.dropped_malformed + self.dropped_duplicate
    }
}
