//! Field parsing for raw earthquake rows.
//!
//! Timestamp and numeric parsing shared by the CSV loader. Every function
//! returns `None` on bad input so the loader can drop the row and count it.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Naive (zone-less) layouts accepted after RFC 3339 fails. Interpreted as
/// UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses an event timestamp.
///
/// Accepts RFC 3339 (`2023-02-06T01:17:34.345Z`, `...+03:00`), a space
/// separated variant with offset (`2023-02-06 01:17:34+00:00`), naive
/// date-times in [`NAIVE_FORMATS`] and bare dates (midnight UTC).
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a finite float. Blank, unparseable, `NaN` and infinite values are
/// rejected.
#[must_use]
pub fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a latitude/longitude pair, rejecting values outside WGS84 bounds.
#[must_use]
pub fn parse_lat_lng(lat: &str, lng: &str) -> Option<(f64, f64)> {
    let latitude = parse_f64(lat)?;
    let longitude = parse_f64(lng)?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some((latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_fractional_and_zulu() {
        let dt = parse_timestamp("2023-02-06T01:17:34.345Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-02-06T01:17:34.345+00:00");
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let dt = parse_timestamp("2023-02-06T04:17:34+03:00").unwrap();
        assert_eq!(dt.to_string(), "2023-02-06 01:17:34 UTC");
    }

    #[test]
    fn parses_space_separated_with_offset() {
        let dt = parse_timestamp("2023-02-06 01:17:34+00:00").unwrap();
        assert_eq!(dt.to_string(), "2023-02-06 01:17:34 UTC");
    }

    #[test]
    fn parses_naive_forms_as_utc() {
        let dt = parse_timestamp("2021-08-14 12:29:08").unwrap();
        assert_eq!(dt.to_string(), "2021-08-14 12:29:08 UTC");
        let dt = parse_timestamp("2021-08-14T12:29:08.5").unwrap();
        assert_eq!(dt.to_string(), "2021-08-14 12:29:08.500 UTC");
    }

    #[test]
    fn parses_bare_date() {
        let dt = parse_timestamp("2020-01-28").unwrap();
        assert_eq!(dt.to_string(), "2020-01-28 00:00:00 UTC");
    }

    #[test]
    fn rejects_invalid_timestamps() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2020-13-01").is_none());
    }

    #[test]
    fn parses_floats() {
        assert_eq!(parse_f64(" 7.1 "), Some(7.1));
        assert_eq!(parse_f64("-12"), Some(-12.0));
        assert!(parse_f64("").is_none());
        assert!(parse_f64("NaN").is_none());
        assert!(parse_f64("inf").is_none());
    }

    #[test]
    fn parses_lat_lng_within_bounds() {
        let (la, lo) = parse_lat_lng("-12.05", "-77.04").unwrap();
        assert!((la - -12.05).abs() < f64::EPSILON);
        assert!((lo - -77.04).abs() < f64::EPSILON);
        assert!(parse_lat_lng("91", "0").is_none());
        assert!(parse_lat_lng("0", "181").is_none());
        assert!(parse_lat_lng("", "10").is_none());
    }
}
