//! Event counts and average magnitude over time.
//!
//! The base chart is a count line on the primary axis and an average
//! magnitude line on a secondary axis fixed to `[0, 10]`. Cumulative and
//! moving-average overlays are optional; when either is on, the bucket
//! with the highest average magnitude is annotated.

use quake_map_charts_models::{
    Annotation, Axis, ChartSpec, HoverMode, Layout, LineDash, LineTrace, YAxis,
};
use quake_map_dataset_models::{AggregatedSeries, SeriesPoint};
use quake_map_quake_models::MagnitudeCategory;

/// Trailing window, in buckets, for the moving-average overlay.
pub const MOVING_AVERAGE_WINDOW: usize = 5;

const TITLE: &str = "Earthquake Trends Over Time";
const X_TITLE: &str = "Date";
const Y_TITLE: &str = "Number of Earthquakes";
const Y2_TITLE: &str = "Average Magnitude";
const HEIGHT: u32 = 500;
const PLACEHOLDER_HEIGHT: u32 = 400;

/// Overlays and title context for [`time_series`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeriesOptions {
    pub cumulative: bool,
    pub moving_average: bool,
    /// Shown in the title when set.
    pub country: Option<String>,
    /// Shown in the title when set.
    pub category: Option<MagnitudeCategory>,
}

/// Chart title for the given filters.
#[must_use]
pub fn title(options: &TimeSeriesOptions) -> String {
    let mut title = TITLE.to_string();
    if let Some(country) = &options.country {
        title.push_str(" - ");
        title.push_str(country);
    }
    if let Some(category) = options.category {
        title.push_str(&format!(" ({} earthquakes)", category.label()));
    }
    title
}

/// Running total.
#[must_use]
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |total, v| {
            *total += v;
            Some(*total)
        })
        .collect()
}

/// Trailing mean over up to `window` values. Leading positions average
/// whatever is available so the output has the same length as the input.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

/// The bucket with the highest average magnitude. Ties go to the earliest.
#[must_use]
pub fn peak_average_magnitude(series: &AggregatedSeries) -> Option<&SeriesPoint> {
    series.points.iter().fold(None::<&SeriesPoint>, |best, p| match best {
        Some(b) if b.average_magnitude >= p.average_magnitude => Some(b),
        _ => Some(p),
    })
}

/// Builds the time-series chart.
#[must_use]
pub fn time_series(series: &AggregatedSeries, options: &TimeSeriesOptions) -> ChartSpec {
    if series.is_empty() {
        return ChartSpec::placeholder(
            Layout::titled(TITLE, PLACEHOLDER_HEIGHT).with_axes(X_TITLE, Y_TITLE),
            "No data available for the selected filters",
        );
    }

    let mut chart = ChartSpec::new(
        Layout::titled(title(options), HEIGHT)
            .with_axes(X_TITLE, Y_TITLE)
            .with_secondary_axis(Axis::new(Y2_TITLE).with_range(0.0, 10.0))
            .with_hover_mode(HoverMode::XUnified)
            .with_legend(true),
    );

    let dates: Vec<_> = series.points.iter().map(|p| p.period).collect();
    #[allow(clippy::cast_precision_loss)]
    let counts: Vec<f64> = series.points.iter().map(|p| p.count as f64).collect();

    let line = |name: &str, y: Vec<f64>, y_axis, color: &str, dash, show_markers| LineTrace {
        name: name.to_string(),
        x: dates.clone(),
        y,
        y_axis,
        color: color.to_string(),
        width: 2.0,
        dash,
        show_markers,
    };

    chart.push(line(
        "Earthquake Count",
        counts.clone(),
        YAxis::Y,
        "#e74c3c",
        LineDash::Solid,
        true,
    ));
    chart.push(line(
        "Average Magnitude",
        series.points.iter().map(|p| p.average_magnitude).collect(),
        YAxis::Y2,
        "#f39c12",
        LineDash::Dash,
        false,
    ));

    if options.cumulative {
        chart.push(line(
            "Cumulative Count",
            cumulative_sum(&counts),
            YAxis::Y,
            "#9b59b6",
            LineDash::Solid,
            false,
        ));
    }

    if options.moving_average {
        chart.push(line(
            &format!("Moving Average ({MOVING_AVERAGE_WINDOW})"),
            moving_average(&counts, MOVING_AVERAGE_WINDOW),
            YAxis::Y,
            "#3498db",
            LineDash::Dot,
            false,
        ));
    }

    if (options.cumulative || options.moving_average)
        && let Some(peak) = peak_average_magnitude(series)
    {
        chart.layout.annotations.push(Annotation::at_point(
            format!("Peak avg magnitude: {:.2}", peak.average_magnitude),
            peak.period,
            peak.average_magnitude,
            YAxis::Y2,
        ));
    }

    chart
}
