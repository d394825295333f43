//! Magnitude histogram.

use quake_map_charts_models::{BarTrace, ChartSpec, Layout};
use quake_map_dataset_models::MagnitudeHistogramBin;

const TITLE: &str = "Magnitude Distribution";
const HEIGHT: u32 = 400;
const BAR_COLOR: &str = "#bd93f9";

#[must_use]
pub fn distribution(bins: &[MagnitudeHistogramBin]) -> ChartSpec {
    let layout = Layout::titled(TITLE, HEIGHT).with_axes("Magnitude", "Frequency");

    if bins.is_empty() {
        return ChartSpec::placeholder(layout, "No data available for magnitude distribution");
    }

    let mut chart = ChartSpec::new(layout);
    chart.push(BarTrace {
        name: "Earthquakes".to_string(),
        x: bins.iter().map(|b| f64::midpoint(b.start, b.end)).collect(),
        width: bins.iter().map(|b| b.end - b.start).collect(),
        y: bins.iter().map(|b| b.count).collect(),
        color: BAR_COLOR.to_string(),
    });
    chart
}
