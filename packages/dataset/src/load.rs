//! CSV reader for the raw earthquake export.
//!
//! Resolves the required columns from the header row (case-insensitive,
//! with a few common aliases), then turns every data row into an
//! [`EarthquakeRecord`]. Bad rows are dropped and tallied in the returned
//! [`LoadReport`]; only source-level failures are errors.

use quake_map_dataset_models::{EarthquakeRecord, LoadReport};

use crate::DatasetError;
use crate::parsing::{parse_f64, parse_lat_lng, parse_timestamp};

/// Required columns as `(canonical name, accepted lowercase header names)`.
const COLUMNS: [(&str, &[&str]); 7] = [
    ("ID", &["id"]),
    ("time", &["time", "date", "datetime"]),
    ("Latitude", &["latitude", "lat"]),
    ("Longitude", &["longitude", "lon", "lng"]),
    ("mag", &["mag", "magnitude"]),
    ("depth", &["depth"]),
    ("Place", &["place", "location"]),
];

/// Header positions of the required columns.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    id: usize,
    time: usize,
    latitude: usize,
    longitude: usize,
    magnitude: usize,
    depth: usize,
    place: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DatasetError> {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let mut found = [0usize; COLUMNS.len()];
        for (slot, (canonical, names)) in found.iter_mut().zip(COLUMNS.iter()) {
            *slot = lowered
                .iter()
                .position(|h| names.contains(&h.as_str()))
                .ok_or(DatasetError::MissingColumn { column: *canonical })?;
        }

        Ok(Self {
            id: found[0],
            time: found[1],
            latitude: found[2],
            longitude: found[3],
            magnitude: found[4],
            depth: found[5],
            place: found[6],
        })
    }
}

/// Why a single row was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowRejection {
    Malformed,
    Timestamp,
    Numeric,
}

fn prepare_row(
    record: &csv::StringRecord,
    columns: ColumnIndex,
) -> Result<EarthquakeRecord, RowRejection> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let id = field(columns.id);
    if id.is_empty() {
        return Err(RowRejection::Malformed);
    }

    let time = parse_timestamp(field(columns.time)).ok_or(RowRejection::Timestamp)?;
    let (latitude, longitude) = parse_lat_lng(field(columns.latitude), field(columns.longitude))
        .ok_or(RowRejection::Numeric)?;
    let magnitude = parse_f64(field(columns.magnitude)).ok_or(RowRejection::Numeric)?;
    let depth = parse_f64(field(columns.depth)).ok_or(RowRejection::Numeric)?;

    Ok(EarthquakeRecord::new(
        id,
        time,
        latitude,
        longitude,
        magnitude,
        depth,
        field(columns.place),
    ))
}

/// Reads every row of a CSV source into prepared records.
///
/// The returned report counts rows read and rows dropped for bad
/// timestamps, bad numeric fields, and malformed records. Duplicate ids are
/// not checked here.
///
/// # Errors
///
/// Returns [`DatasetError`] on I/O failure, an unreadable header row, or a
/// missing required column.
pub fn read_records<R: std::io::Read>(
    reader: R,
) -> Result<(Vec<EarthquakeRecord>, LoadReport), DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for (line, result) in reader.records().enumerate() {
        report.rows_read += 1;

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::debug!("Dropping malformed row {}: {e}", line + 1);
                report.dropped_malformed += 1;
                continue;
            }
        };

        match prepare_row(&record, columns) {
            Ok(prepared) => records.push(prepared),
            Err(reason) => {
                log::debug!("Dropping row {} ({reason:?}): {record:?}", line + 1);
                match reason {
                    RowRejection::Malformed => report.dropped_malformed += 1,
                    RowRejection::Timestamp => report.dropped_timestamp += 1,
                    RowRejection::Numeric => report.dropped_numeric += 1,
                }
            }
        }
    }

    report.rows_kept = records.len() as u64;
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quake_map_quake_models::MagnitudeCategory;

    const SAMPLE: &str = "\
ID,time,Latitude,Longitude,mag,depth,Place
us7000abcd,2020-03-14T10:00:00.000Z,35.68,139.69,5.2,10,\"Tokyo, Japan\"
us7000efgh,2020-07-01T22:15:00Z,-12.05,-77.04,7.1,30,\"Lima, Peru\"
";

    #[test]
    fn reads_sample_rows() {
        let (records, report) = read_records(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(report.rows_read, 2);
        assert_eq!(report.dropped(), 0);

        let lima = &records[1];
        assert_eq!(lima.id, "us7000efgh");
        assert_eq!(lima.year, 2020);
        assert_eq!(lima.month, 7);
        assert_eq!(lima.country.as_deref(), Some("Peru"));
        assert_eq!(lima.magnitude_category, MagnitudeCategory::High);
    }

    #[test]
    fn resolves_columns_by_alias_and_case() {
        let csv = "place,MAGNITUDE,Depth,lng,lat,Date,id\n\"Suva, Fiji\",6.0,500,178.4,-18.1,2019-05-05,x1\n";
        let (records, _) = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "x1");
        assert!((records[0].depth - 500.0).abs() < f64::EPSILON);
        assert!((records[0].longitude - 178.4).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "ID,time,Latitude,Longitude,mag,Place\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { column: "depth" }));
    }

    #[test]
    fn bad_rows_are_counted_not_fatal() {
        let csv = "\
ID,time,Latitude,Longitude,mag,depth,Place
,2020-01-01,1,1,5,5,nowhere
a,not a time,1,1,5,5,nowhere
b,2020-01-01,95,1,5,5,nowhere
c,2020-01-01,1,1,,5,nowhere
d,2020-01-01
e,2020-01-01,1,1,4.5,5,
";
        let (records, report) = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "e");
        assert_eq!(records[0].country, None);
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.dropped_malformed, 1);
        assert_eq!(report.dropped_timestamp, 1);
        assert_eq!(report.dropped_numeric, 3);
    }
}
