//! Read-only queries over the prepared dataset.
//!
//! Every function takes the [`Dataset`] by reference and returns a new
//! view or aggregate. Nothing here fails on an empty result; callers get
//! an empty [`Table`], series, or summary instead.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use quake_map_dataset_models::{
    AggregatedSeries, EarthquakeRecord, FilterCriteria, MagnitudeHistogramBin, MonthSelection,
    RiskMetric, RiskSummaryRow, SeriesPoint, TimeGranularity,
};

use crate::{Dataset, Table};

/// Default number of bins for [`magnitude_histogram`].
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Returns `true` when `record` satisfies every predicate in `criteria`.
#[must_use]
pub fn matches(criteria: &FilterCriteria, record: &EarthquakeRecord) -> bool {
    if let Some(year) = criteria.year
        && record.year != year
    {
        return false;
    }

    if let Some(range) = criteria.year_range
        && !range.contains(record.year)
    {
        return false;
    }

    if let Some(month) = criteria.month
        && record.month != month
    {
        return false;
    }

    if let Some(ref country) = criteria.country
        && !contains_ignore_case(&record.place, country)
    {
        return false;
    }

    if let Some(range) = criteria.magnitude_range
        && !range.contains(record.magnitude)
    {
        return false;
    }

    if let Some(category) = criteria.category
        && record.magnitude_category != category
    {
        return false;
    }

    if let Some(range) = criteria.date_range
        && !range.contains(record.date())
    {
        return false;
    }

    true
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Applies `criteria` to the whole dataset.
///
/// Returns an empty table when nothing matches.
#[must_use]
pub fn get_filtered<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> Table<'a> {
    if criteria.is_unconstrained() {
        return dataset.table();
    }

    let rows: Vec<&EarthquakeRecord> = dataset
        .records()
        .iter()
        .filter(|r| matches(criteria, r))
        .collect();

    log::debug!(
        "Filter {criteria:?} matched {} of {} rows",
        rows.len(),
        dataset.len()
    );

    Table::from_rows(rows)
}

/// Aggregates an existing view into per-period counts and mean magnitudes.
///
/// Periods with no rows are omitted rather than zero-filled.
#[must_use]
pub fn aggregate_series(table: &Table<'_>, granularity: TimeGranularity) -> AggregatedSeries {
    let mut buckets: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();

    for record in table.iter() {
        let entry = buckets
            .entry(granularity.bucket_start(record.date()))
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.magnitude;
    }

    let points = buckets
        .into_iter()
        .map(|(period, (count, magnitude_sum))| {
            #[allow(clippy::cast_precision_loss)]
            let average_magnitude = magnitude_sum / count as f64;
            SeriesPoint {
                period,
                count,
                average_magnitude,
            }
        })
        .collect();

    AggregatedSeries {
        granularity,
        points,
    }
}

/// Filters the dataset and buckets the result by day or month.
#[must_use]
pub fn get_time_series(
    dataset: &Dataset,
    criteria: &FilterCriteria,
    granularity: TimeGranularity,
) -> AggregatedSeries {
    aggregate_series(&get_filtered(dataset, criteria), granularity)
}

/// Resolves a year plus month selection into a date window and returns the
/// matching series.
///
/// A whole year is bucketed by month; a single month is bucketed by day.
/// `base` carries any additional predicates (country, category, ...).
#[must_use]
pub fn time_series_for_period(
    dataset: &Dataset,
    year: i32,
    month: MonthSelection,
    base: &FilterCriteria,
) -> AggregatedSeries {
    let Some((from, to)) = period_bounds(year, month) else {
        log::warn!("Cannot build a date window for year {year}, month {month:?}");
        return AggregatedSeries::empty(match month {
            MonthSelection::All => TimeGranularity::Month,
            MonthSelection::Month(_) => TimeGranularity::Day,
        });
    };

    let mut criteria = base.clone().with_date_range(from, to);
    if let MonthSelection::Month(m) = month {
        criteria = criteria.with_month(m);
    }

    let granularity = TimeGranularity::for_criteria(&criteria);
    get_time_series(dataset, &criteria, granularity)
}

/// First and last calendar date of a year or of one month in it.
#[must_use]
pub fn period_bounds(year: i32, month: MonthSelection) -> Option<(NaiveDate, NaiveDate)> {
    match month {
        MonthSelection::All => Some((
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )),
        MonthSelection::Month(m) => {
            let first = NaiveDate::from_ymd_opt(year, m, 1)?;
            let next_month = if m == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, m + 1, 1)?
            };
            Some((first, next_month.pred_opt()?))
        }
    }
}

/// Per-country summary over the whole dataset.
#[must_use]
pub fn get_risk_summary(dataset: &Dataset, metric: RiskMetric) -> Vec<RiskSummaryRow> {
    risk_summary(&dataset.table(), metric)
}

/// Per-country summary over an existing view.
///
/// Rows without an extracted country are skipped. `value` is the selected
/// metric scaled into `[0, 1]` between a floor and the largest value across
/// countries. The floor is zero, or the smallest value when that is
/// negative, so non-negative metrics keep their ratio to the top country.
/// When every country has the same value, all of them get `1.0`. Ordered
/// by `value` descending, then by country name.
#[must_use]
pub fn risk_summary(table: &Table<'_>, metric: RiskMetric) -> Vec<RiskSummaryRow> {
    struct CountryAccum {
        count: u64,
        magnitude_sum: f64,
        max_magnitude: f64,
    }

    let mut by_country: BTreeMap<&str, CountryAccum> = BTreeMap::new();

    for record in table.iter() {
        let Some(country) = record.country.as_deref() else {
            continue;
        };
        let entry = by_country.entry(country).or_insert(CountryAccum {
            count: 0,
            magnitude_sum: 0.0,
            max_magnitude: f64::NEG_INFINITY,
        });
        entry.count += 1;
        entry.magnitude_sum += record.magnitude;
        entry.max_magnitude = entry.max_magnitude.max(record.magnitude);
    }

    let mut rows: Vec<RiskSummaryRow> = by_country
        .into_iter()
        .map(|(country, acc)| {
            #[allow(clippy::cast_precision_loss)]
            let avg_magnitude = acc.magnitude_sum / acc.count as f64;
            RiskSummaryRow {
                country: country.to_string(),
                count: acc.count,
                avg_magnitude,
                max_magnitude: acc.max_magnitude,
                value: 0.0,
            }
        })
        .collect();

    let raw = |row: &RiskSummaryRow| -> f64 {
        match metric {
            #[allow(clippy::cast_precision_loss)]
            RiskMetric::Count => row.count as f64,
            RiskMetric::AvgMagnitude => row.avg_magnitude,
            RiskMetric::MaxMagnitude => row.max_magnitude,
        }
    };

    let max = rows.iter().map(raw).fold(f64::NEG_INFINITY, f64::max);
    let floor = rows.iter().map(raw).fold(0.0_f64, f64::min);
    let span = max - floor;
    for row in &mut rows {
        row.value = if span > 0.0 {
            ((raw(row) - floor) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    rows.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.country.cmp(&b.country))
    });

    rows
}

/// Looks an event up by identifier. Not-found is `None`, never an error.
#[must_use]
pub fn find_by_id<'a>(dataset: &'a Dataset, id: &str) -> Option<&'a EarthquakeRecord> {
    dataset.get(id.trim())
}

/// Events whose planar degree distance from `(latitude, longitude)` is
/// below `radius_deg`, in dataset order, capped at `limit`.
#[must_use]
pub fn nearby(
    dataset: &Dataset,
    latitude: f64,
    longitude: f64,
    radius_deg: f64,
    limit: usize,
) -> Table<'_> {
    let rows = dataset
        .records()
        .iter()
        .filter(|r| (r.latitude - latitude).hypot(r.longitude - longitude) < radius_deg)
        .take(limit)
        .collect();
    Table::from_rows(rows)
}

/// Distinct event years, ascending.
#[must_use]
pub fn available_years(dataset: &Dataset) -> Vec<i32> {
    dataset.table().years()
}

/// Distinct extracted countries, sorted.
#[must_use]
pub fn available_countries(dataset: &Dataset) -> Vec<String> {
    let mut countries: Vec<String> = dataset
        .records()
        .iter()
        .filter_map(|r| r.country.clone())
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

/// Equal-width magnitude histogram over a view.
///
/// Bins span the smallest to the largest magnitude; the last bin is closed
/// on both ends. A view whose magnitudes are all equal yields one bin.
/// Empty views or `bins == 0` yield no bins.
#[must_use]
pub fn magnitude_histogram(table: &Table<'_>, bins: usize) -> Vec<MagnitudeHistogramBin> {
    if table.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = table.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
        (lo.min(r.magnitude), hi.max(r.magnitude))
    });

    if (max - min).abs() < f64::EPSILON {
        return vec![MagnitudeHistogramBin {
            start: min,
            end: max,
            count: table.len() as u64,
        }];
    }

    #[allow(clippy::cast_precision_loss)]
    let width = (max - min) / bins as f64;
    let mut counts = vec![0u64; bins];

    for record in table.iter() {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let idx = (((record.magnitude - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            #[allow(clippy::cast_precision_loss)]
            let start = (i as f64).mul_add(width, min);
            MagnitudeHistogramBin {
                start,
                end: start + width,
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone as _, Utc};
    use quake_map_quake_models::MagnitudeCategory;

    #[allow(clippy::too_many_arguments)]
    fn quake(
        id: &str,
        (y, m, d): (i32, u32, u32),
        magnitude: f64,
        depth: f64,
        place: &str,
        (lat, lon): (f64, f64),
    ) -> EarthquakeRecord {
        EarthquakeRecord::new(
            id,
            Utc.with_ymd_and_hms(y, m, d, 6, 30, 0).unwrap(),
            lat,
            lon,
            magnitude,
            depth,
            place,
        )
    }

    fn scenario() -> Dataset {
        Dataset::from_records(vec![
            quake("tokyo", (2020, 3, 14), 5.2, 10.0, "Tokyo, Japan", (35.68, 139.69)),
            quake("lima", (2020, 7, 1), 7.1, 30.0, "Lima, Peru", (-12.05, -77.04)),
        ])
    }

    fn larger() -> Dataset {
        Dataset::from_records(vec![
            quake("a", (2019, 1, 5), 4.5, 12.0, "10 km N of Sendai, Japan", (38.3, 140.9)),
            quake("b", (2019, 1, 5), 5.5, 40.0, "Arequipa, Peru", (-16.4, -71.5)),
            quake("c", (2019, 1, 20), 6.0, 15.0, "Kobe, Japan", (34.7, 135.2)),
            quake("d", (2019, 3, 2), 6.8, 70.0, "Fiji region", (-17.8, 178.0)),
            quake("e", (2020, 2, 29), 7.4, 25.0, "Osaka, Japan", (34.7, 135.5)),
            quake("f", (2021, 12, 31), 5.0, 5.0, "", (0.0, 0.0)),
        ])
    }

    #[test]
    fn scenario_year_filter_returns_both_rows() {
        let dataset = scenario();
        let table = get_filtered(&dataset, &FilterCriteria::all().with_year(2020));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn scenario_magnitude_range_returns_only_lima() {
        let dataset = scenario();
        let criteria = FilterCriteria::all()
            .with_year(2020)
            .with_magnitude_range(6.0, 8.0);
        let table = get_filtered(&dataset, &criteria);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].id, "lima");
        assert_eq!(table.rows()[0].magnitude_category, MagnitudeCategory::High);
    }

    #[test]
    fn filtering_is_pure_and_leaves_dataset_untouched() {
        let dataset = larger();
        let before: Vec<EarthquakeRecord> = dataset.records().to_vec();
        let criteria = FilterCriteria::all().with_country("japan").with_year_range(2019, 2020);

        let first = get_filtered(&dataset, &criteria);
        let second = get_filtered(&dataset, &criteria);
        assert_eq!(first, second);

        for _ in 0..10 {
            let _ = get_filtered(&dataset, &FilterCriteria::all().with_month(1));
            let _ = get_risk_summary(&dataset, RiskMetric::Count);
        }
        assert_eq!(dataset.records(), before.as_slice());
    }

    #[test]
    fn year_range_is_inclusive() {
        let dataset = larger();
        let table = get_filtered(&dataset, &FilterCriteria::all().with_year_range(2020, 2021));
        assert!(table.iter().all(|r| (2020..=2021).contains(&r.year)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn country_filter_is_case_insensitive_substring_of_place() {
        let dataset = larger();
        let table = get_filtered(&dataset, &FilterCriteria::all().with_country("JAPAN"));
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|r| r.place.to_lowercase().contains("japan")));

        let partial = get_filtered(&dataset, &FilterCriteria::all().with_country("ka"));
        let ids: Vec<&str> = partial.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["e"]);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let dataset = larger();
        let criteria = FilterCriteria::all()
            .with_year(2019)
            .with_month(1)
            .with_category(MagnitudeCategory::Medium);
        let ids: Vec<&str> = get_filtered(&dataset, &criteria)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn empty_result_is_an_empty_table() {
        let dataset = larger();
        let table = get_filtered(&dataset, &FilterCriteria::all().with_year(1900));
        assert!(table.is_empty());
    }

    #[test]
    fn monthly_series_omits_empty_months() {
        let dataset = larger();
        let series = get_time_series(
            &dataset,
            &FilterCriteria::all().with_year(2019),
            TimeGranularity::Month,
        );
        assert_eq!(series.granularity, TimeGranularity::Month);
        let periods: Vec<String> = series.points.iter().map(|p| p.period.to_string()).collect();
        assert_eq!(periods, vec!["2019-01-01", "2019-03-01"]);
        assert_eq!(series.points[0].count, 3);
        assert!((series.points[0].average_magnitude - 16.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn daily_series_for_a_month() {
        let dataset = larger();
        let series = time_series_for_period(
            &dataset,
            2019,
            MonthSelection::Month(1),
            &FilterCriteria::all(),
        );
        assert_eq!(series.granularity, TimeGranularity::Day);
        let counts: Vec<(String, u64)> = series
            .points
            .iter()
            .map(|p| (p.period.to_string(), p.count))
            .collect();
        assert_eq!(
            counts,
            vec![("2019-01-05".to_string(), 2), ("2019-01-20".to_string(), 1)]
        );
    }

    #[test]
    fn month_with_no_rows_yields_empty_series() {
        let dataset = larger();
        let series = time_series_for_period(
            &dataset,
            2019,
            MonthSelection::Month(6),
            &FilterCriteria::all(),
        );
        assert!(series.is_empty());
    }

    #[test]
    fn whole_year_period_uses_monthly_buckets() {
        let dataset = larger();
        let series = time_series_for_period(
            &dataset,
            2020,
            MonthSelection::All,
            &FilterCriteria::all().with_country("japan"),
        );
        assert_eq!(series.granularity, TimeGranularity::Month);
        assert_eq!(series.len(), 1);
        assert_eq!(series.points[0].period.to_string(), "2020-02-01");
    }

    #[test]
    fn period_bounds_handles_leap_years_and_december() {
        let (from, to) = period_bounds(2020, MonthSelection::Month(2)).unwrap();
        assert_eq!((from.to_string(), to.to_string()), ("2020-02-01".into(), "2020-02-29".into()));
        let (_, to) = period_bounds(2021, MonthSelection::Month(12)).unwrap();
        assert_eq!(to.to_string(), "2021-12-31");
        assert!(period_bounds(2021, MonthSelection::Month(13)).is_none());
    }

    #[test]
    fn risk_summary_by_count() {
        let dataset = larger();
        let rows = get_risk_summary(&dataset, RiskMetric::Count);
        let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["Japan", "Fiji", "Peru"]);
        assert_eq!(rows[0].count, 3);
        assert!((rows[0].value - 1.0).abs() < f64::EPSILON);
        assert!((rows[1].value - 1.0 / 3.0).abs() < 1e-9);
        assert!((rows[0].max_magnitude - 7.4).abs() < f64::EPSILON);
        assert!((rows[0].avg_magnitude - (4.5 + 6.0 + 7.4) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn risk_summary_by_max_magnitude() {
        let dataset = larger();
        let rows = get_risk_summary(&dataset, RiskMetric::MaxMagnitude);
        assert_eq!(rows[0].country, "Japan");
        assert_eq!(rows[1].country, "Fiji");
        assert!(rows.iter().all(|r| r.value > 0.0 && r.value <= 1.0));
    }

    #[test]
    fn risk_value_stays_in_unit_range_for_negative_magnitudes() {
        let dataset = Dataset::from_records(vec![
            quake("x", (2020, 1, 1), 2.0, 5.0, "X, Alpha", (10.0, 10.0)),
            quake("y", (2020, 1, 2), -1.5, 5.0, "Y, Beta", (11.0, 11.0)),
        ]);
        for metric in [RiskMetric::AvgMagnitude, RiskMetric::MaxMagnitude] {
            let rows = get_risk_summary(&dataset, metric);
            assert!(rows.iter().all(|r| (0.0..=1.0).contains(&r.value)));
            assert_eq!(rows[0].country, "Alpha");
            assert!((rows[0].value - 1.0).abs() < f64::EPSILON);
            assert!(rows[1].value.abs() < f64::EPSILON);
        }

        let all_negative = Dataset::from_records(vec![
            quake("p", (2020, 1, 1), -0.5, 5.0, "P, Gamma", (10.0, 10.0)),
            quake("q", (2020, 1, 2), -1.0, 5.0, "Q, Delta", (11.0, 11.0)),
        ]);
        let rows = get_risk_summary(&all_negative, RiskMetric::AvgMagnitude);
        assert_eq!(rows[0].country, "Gamma");
        assert!((rows[0].value - 1.0).abs() < f64::EPSILON);
        assert!(rows[1].value.abs() < f64::EPSILON);
    }

    #[test]
    fn equal_metric_values_all_rank_at_the_top() {
        let rows = get_risk_summary(&scenario(), RiskMetric::Count);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| (r.value - 1.0).abs() < f64::EPSILON));
        assert_eq!(rows[0].country, "Japan");
    }

    #[test]
    fn risk_summary_of_empty_dataset_is_empty() {
        let dataset = Dataset::default();
        assert!(get_risk_summary(&dataset, RiskMetric::AvgMagnitude).is_empty());
    }

    #[test]
    fn find_by_id_reports_not_found_as_none() {
        let dataset = larger();
        assert_eq!(find_by_id(&dataset, "d").map(|r| r.depth), Some(70.0));
        assert!(find_by_id(&dataset, "nope").is_none());
    }

    #[test]
    fn nearby_uses_degree_distance_and_limit() {
        let dataset = larger();
        let close = nearby(&dataset, 34.7, 135.3, 5.0, 50);
        let ids: Vec<&str> = close.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "e"]);

        let capped = nearby(&dataset, 34.7, 135.3, 5.0, 1);
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn available_years_and_countries() {
        let dataset = larger();
        assert_eq!(available_years(&dataset), vec![2019, 2020, 2021]);
        assert_eq!(available_countries(&dataset), vec!["Fiji", "Japan", "Peru"]);
    }

    #[test]
    fn histogram_bins_cover_every_row() {
        let dataset = larger();
        let table = dataset.table();
        let bins = magnitude_histogram(&table, 6);
        assert_eq!(bins.len(), 6);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 6);
        assert!((bins[0].start - 4.5).abs() < 1e-9);
        assert!((bins[5].end - 7.4).abs() < 1e-9);
        assert_eq!(bins[5].count, 1);
    }

    #[test]
    fn histogram_edge_cases() {
        let empty = Dataset::default();
        assert!(magnitude_histogram(&empty.table(), DEFAULT_HISTOGRAM_BINS).is_empty());

        let single = scenario();
        assert!(magnitude_histogram(&single.table(), 0).is_empty());

        let same = Dataset::from_records(vec![
            quake("x", (2020, 1, 1), 5.0, 1.0, "A, B", (0.0, 0.0)),
            quake("y", (2020, 1, 2), 5.0, 1.0, "A, B", (0.0, 0.0)),
        ]);
        let bins = magnitude_histogram(&same.table(), 10);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
    }
}
