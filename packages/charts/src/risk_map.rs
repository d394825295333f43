//! Per-country choropleth over the risk summary.

use quake_map_charts_models::{
    ChartSpec, ChoroplethTrace, ColorScale, GeoView, Layout, LocationMode, Projection,
    RegionShape,
};
use quake_map_dataset_models::{RiskMetric, RiskSummaryRow};
use quake_map_geography::BoundaryGeometry;

use crate::geo_point;

const TITLE: &str = "Global Earthquake Risk Map";
const HEIGHT: u32 = 600;

/// Builds the risk choropleth.
///
/// With boundary geometry loaded, the shapes of every summarized country
/// found in it are embedded in the trace and matched by name; otherwise
/// the renderer is asked to resolve country names itself.
#[must_use]
pub fn risk_map(
    rows: &[RiskSummaryRow],
    metric: RiskMetric,
    boundaries: &BoundaryGeometry,
) -> ChartSpec {
    if rows.is_empty() {
        return ChartSpec::placeholder(
            Layout::titled(TITLE, HEIGHT),
            "No data available for risk map",
        );
    }

    let (location_mode, projection, shapes) = if boundaries.is_empty() {
        (LocationMode::CountryNames, Projection::Equirectangular, Vec::new())
    } else {
        let shapes: Vec<RegionShape> = rows
            .iter()
            .filter_map(|row| boundaries.find(&row.country))
            .map(|boundary| RegionShape {
                name: boundary.name.clone(),
                rings: boundary
                    .rings()
                    .into_iter()
                    .map(|ring| ring.into_iter().map(geo_point).collect())
                    .collect(),
            })
            .collect();
        log::debug!(
            "Matched {} of {} summarized countries to boundaries",
            shapes.len(),
            rows.len()
        );
        (LocationMode::FeatureName, Projection::NaturalEarth, shapes)
    };

    let locations = rows
        .iter()
        .map(|row| match location_mode {
            LocationMode::FeatureName => boundaries
                .find(&row.country)
                .map_or_else(|| row.country.clone(), |b| b.name.clone()),
            LocationMode::CountryNames => row.country.clone(),
        })
        .collect();

    let mut chart = ChartSpec::new(
        Layout::titled(format!("{TITLE} - {}", metric.label()), HEIGHT)
            .with_geo(GeoView::world(projection)),
    );

    chart.push(ChoroplethTrace {
        locations,
        values: rows.iter().map(|r| r.value).collect(),
        location_mode,
        color_scale: ColorScale::Reds,
        text: rows
            .iter()
            .map(|r| {
                format!(
                    "<b>{}</b><br>Count: {}<br>Avg magnitude: {:.2}<br>Max magnitude: {:.1}",
                    r.country, r.count, r.avg_magnitude, r.max_magnitude
                )
            })
            .collect(),
        shapes,
    });

    chart
}
