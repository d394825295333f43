#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake dataset loading, preparation, and query layer.
//!
//! The dataset is read once from CSV at startup, every row is normalized
//! into an [`EarthquakeRecord`], and the resulting [`Dataset`] is treated as
//! immutable for the rest of the process. Queries in [`queries`] borrow rows
//! into [`Table`] views and never modify the underlying records.

pub mod load;
pub mod parsing;
pub mod queries;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quake_map_dataset_models::{EarthquakeRecord, LoadReport};
use thiserror::Error;

/// Errors that can occur while loading the dataset.
///
/// Only source-level failures surface here; individual bad rows are
/// dropped and counted in [`LoadReport`].
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be opened.
    #[error("Failed to open dataset {}: {source}", path.display())]
    Open {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// CSV reading failed at the source level (I/O or header).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The header row lacks a required column.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn {
        /// Canonical name of the missing column.
        column: &'static str,
    },
}

/// The prepared, immutable earthquake table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<EarthquakeRecord>,
    by_id: BTreeMap<String, usize>,
    report: LoadReport,
}

impl Dataset {
    /// Wraps already-prepared records.
    ///
    /// Records with a duplicate `id` are dropped (first occurrence wins) and
    /// counted in the report.
    #[must_use]
    pub fn from_records(records: Vec<EarthquakeRecord>) -> Self {
        let rows_read = records.len() as u64;
        let mut report = LoadReport {
            rows_read,
            ..LoadReport::default()
        };
        let mut kept = Vec::with_capacity(records.len());
        let mut by_id = BTreeMap::new();

        for record in records {
            if by_id.contains_key(&record.id) {
                log::debug!("Dropping duplicate event id {}", record.id);
                report.dropped_duplicate += 1;
                continue;
            }
            by_id.insert(record.id.clone(), kept.len());
            kept.push(record);
        }

        report.rows_kept = kept.len() as u64;

        Self {
            records: kept,
            by_id,
            report,
        }
    }

    /// Reads and prepares a dataset from any CSV source.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the source cannot be read or lacks a
    /// required column.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, DatasetError> {
        let (records, mut report) = load::read_records(reader)?;
        let mut dataset = Self::from_records(records);
        report.dropped_duplicate += dataset.report.dropped_duplicate;
        report.rows_kept = dataset.report.rows_kept;
        dataset.report = report;
        Ok(dataset)
    }

    /// All prepared records in source order.
    #[must_use]
    pub fn records(&self) -> &[EarthquakeRecord] {
        &self.records
    }

    /// Row accounting from the load.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Number of prepared records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks a record up by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EarthquakeRecord> {
        self.by_id.get(id).and_then(|&idx| self.records.get(idx))
    }

    /// A view over every record.
    #[must_use]
    pub fn table(&self) -> Table<'_> {
        Table {
            rows: self.records.iter().collect(),
        }
    }
}

/// Loads the dataset from a CSV file and prepares every row.
///
/// Rows with unparseable timestamps or numeric fields are dropped and
/// counted; only an unreadable source fails.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened, is not valid CSV
/// at the source level, or lacks a required column.
pub fn load_and_prepare(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    log::info!("Loading earthquake dataset from {}", path.display());

    let file = std::fs::File::open(path).map_err(|source| DatasetError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = Dataset::from_reader(std::io::BufReader::new(file))?;

    let report = dataset.report();
    log::info!(
        "Prepared {} of {} earthquake rows",
        report.rows_kept,
        report.rows_read
    );
    if report.dropped() > 0 {
        log::warn!(
            "Dropped {} rows ({} bad timestamp, {} bad numeric, {} malformed, {} duplicate id)",
            report.dropped(),
            report.dropped_timestamp,
            report.dropped_numeric,
            report.dropped_malformed,
            report.dropped_duplicate,
        );
    }

    Ok(dataset)
}

/// A read-only view of dataset rows produced by a query.
///
/// Views borrow from the [`Dataset`]; narrowing a view produces a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table<'a> {
    rows: Vec<&'a EarthquakeRecord>,
}

impl<'a> Table<'a> {
    /// Builds a view from borrowed rows.
    #[must_use]
    pub const fn from_rows(rows: Vec<&'a EarthquakeRecord>) -> Self {
        Self { rows }
    }

    /// The rows in this view.
    #[must_use]
    pub fn rows(&self) -> &[&'a EarthquakeRecord] {
        &self.rows
    }

    /// Iterates over the rows in this view.
    pub fn iter(&self) -> impl Iterator<Item = &'a EarthquakeRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a new view with only the rows matching `predicate`.
    #[must_use]
    pub fn retain(&self, mut predicate: impl FnMut(&EarthquakeRecord) -> bool) -> Self {
        Self {
            rows: self.rows.iter().copied().filter(|r| predicate(r)).collect(),
        }
    }

    /// Distinct years present in the view, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone as _, Utc};

    fn record(id: &str, magnitude: f64) -> EarthquakeRecord {
        EarthquakeRecord::new(
            id,
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            0.0,
            0.0,
            magnitude,
            10.0,
            "Somewhere, Chile",
        )
    }

    #[test]
    fn from_records_drops_duplicate_ids() {
        let dataset = Dataset::from_records(vec![record("a", 5.0), record("b", 6.0), record("a", 7.0)]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.report().dropped_duplicate, 1);
        assert!((dataset.get("a").unwrap().magnitude - 5.0).abs() < f64::EPSILON);
        assert!(dataset.get("zzz").is_none());
    }

    #[test]
    fn retain_produces_new_view() {
        let dataset = Dataset::from_records(vec![record("a", 5.0), record("b", 6.0)]);
        let all = dataset.table();
        let strong = all.retain(|r| r.magnitude >= 6.0);
        assert_eq!(all.len(), 2);
        assert_eq!(strong.len(), 1);
        assert_eq!(strong.rows()[0].id, "b");
    }

    #[test]
    fn from_reader_reports_all_drop_reasons() {
        let csv = "\
ID,time,Latitude,Longitude,mag,depth,Place
a,2020-01-01T00:00:00Z,1,2,5.0,10,\"Tokyo, Japan\"
b,garbage,1,2,5.0,10,\"Tokyo, Japan\"
c,2020-01-02T00:00:00Z,1,2,abc,10,\"Tokyo, Japan\"
a,2020-01-03T00:00:00Z,1,2,6.0,10,\"Tokyo, Japan\"
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let report = dataset.report();
        assert_eq!(report.rows_read, 4);
        assert_eq!(report.rows_kept, 1);
        assert_eq!(report.dropped_timestamp, 1);
        assert_eq!(report.dropped_numeric, 1);
        assert_eq!(report.dropped_duplicate, 1);
        assert_eq!(report.dropped(), 3);
    }

    #[test]
    fn load_and_prepare_reports_missing_file() {
        let err = load_and_prepare("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DatasetError::Open { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
