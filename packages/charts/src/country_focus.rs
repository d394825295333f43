//! Events of a single country on a zoomed map.

use quake_map_charts_models::{
    ChartSpec, ColorScale, GeoMarkerTrace, GeoPoint, GeoView, Layout, MarkerColor, MarkerSymbol,
};
use quake_map_dataset::Table;
use quake_map_geography::BoundaryGeometry;

use crate::{MAGNITUDE_SCALE_TITLE, geo_point};

const HEIGHT: u32 = 500;
const ZOOM: f64 = 4.0;
/// Largest marker diameter; the strongest event in view gets this size.
const MAX_MARKER_SIZE: f64 = 20.0;

/// Builds the country focus map from rows already narrowed to `country`.
///
/// The view is centered on the country's boundary when one is loaded and
/// on the mean event position otherwise.
#[must_use]
pub fn country_focus(table: &Table<'_>, country: &str, boundaries: &BoundaryGeometry) -> ChartSpec {
    if table.is_empty() {
        return ChartSpec::placeholder(
            Layout::titled(format!("Earthquake Map - {country}"), HEIGHT),
            format!("No earthquake data available for {country}"),
        );
    }

    let center = boundaries.bounds(country).map_or_else(
        || mean_position(table),
        |bounds| geo_point(bounds.center()),
    );

    let max_magnitude = table
        .iter()
        .map(|r| r.magnitude)
        .fold(f64::NEG_INFINITY, f64::max);
    let scale = if max_magnitude > 0.0 {
        MAX_MARKER_SIZE / max_magnitude
    } else {
        1.0
    };

    let mut chart = ChartSpec::new(
        Layout::titled(format!("Earthquake Locations - {country}"), HEIGHT)
            .with_geo(GeoView::focused(center, ZOOM)),
    );

    chart.push(GeoMarkerTrace {
        name: Some(country.to_string()),
        lat: table.iter().map(|r| r.latitude).collect(),
        lon: table.iter().map(|r| r.longitude).collect(),
        size: table.iter().map(|r| r.magnitude * scale).collect(),
        color: MarkerColor::Scale {
            values: table.iter().map(|r| r.magnitude).collect(),
            scale: ColorScale::Reds,
            show_scale: true,
            color_bar_title: Some(MAGNITUDE_SCALE_TITLE.to_string()),
        },
        symbol: MarkerSymbol::Circle,
        opacity: 1.0,
        text: table
            .iter()
            .map(|r| {
                format!(
                    "<b>{}</b><br>Time: {}<br>Depth: {} km",
                    r.place,
                    r.time.to_rfc3339(),
                    r.depth
                )
            })
            .collect(),
        show_legend: false,
    });

    chart
}

/// Mean latitude and circular mean longitude, so events either side of
/// the antimeridian center near 180 rather than 0.
#[allow(clippy::cast_precision_loss)]
fn mean_position(table: &Table<'_>) -> GeoPoint {
    let n = table.len() as f64;
    let (lat, sin, cos) = table.iter().fold((0.0, 0.0, 0.0), |(lat, sin, cos), r| {
        let lon = r.longitude.to_radians();
        (lat + r.latitude, sin + lon.sin(), cos + lon.cos())
    });
    GeoPoint {
        lat: lat / n,
        lon: f64::atan2(sin, cos).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use quake_map_charts_models::Trace;
    use quake_map_dataset::queries;
    use quake_map_dataset_models::FilterCriteria;

    #[test]
    fn centers_on_boundary_when_known() {
        let dataset = fixtures::dataset();
        let boundaries = BoundaryGeometry::from_geojson_str(fixtures::BOUNDARIES).unwrap();
        let table = queries::get_filtered(&dataset, &FilterCriteria::all().with_country("Japan"));
        let chart = country_focus(&table, "Japan", &boundaries);

        let geo = chart.layout.geo.as_ref().unwrap();
        assert_eq!(geo.center, Some(GeoPoint { lat: 38.0, lon: 137.5 }));
        assert_eq!(geo.zoom, Some(ZOOM));
        assert_eq!(chart.layout.title.as_deref(), Some("Earthquake Locations - Japan"));

        let Trace::GeoMarkers(markers) = &chart.traces[0] else {
            panic!("expected markers");
        };
        assert_eq!(markers.lat.len(), 3);
        // Kobe (6.9) is the strongest and gets the largest marker
        assert!((markers.size[1] - MAX_MARKER_SIZE).abs() < 1e-9);
    }

    #[test]
    fn centers_on_mean_position_without_boundary() {
        let dataset = fixtures::dataset();
        let table = queries::get_filtered(&dataset, &FilterCriteria::all().with_country("peru"));
        let chart = country_focus(&table, "Peru", &BoundaryGeometry::default());
        let center = chart.layout.geo.unwrap().center.unwrap();
        assert!((center.lat - -12.05).abs() < 1e-9);
        assert!((center.lon - -77.04).abs() < 1e-9);
    }

    #[test]
    fn events_across_the_antimeridian_center_near_180() {
        let records = vec![
            fixtures::quake("t1", (2021, 3, 4), 6.1, 20.0, "Nukualofa, Tonga", (-17.0, 179.0)),
            fixtures::quake("t2", (2021, 3, 5), 5.4, 35.0, "Neiafu, Tonga", (-19.0, -179.0)),
        ];
        let table = Table::from_rows(records.iter().collect());
        let chart = country_focus(&table, "Tonga", &BoundaryGeometry::default());
        let center = chart.layout.geo.unwrap().center.unwrap();
        assert!((center.lat - -18.0).abs() < 1e-9);
        assert!((center.lon.abs() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn empty_country_renders_placeholder() {
        let dataset = fixtures::dataset();
        let table = queries::get_filtered(&dataset, &FilterCriteria::all().with_country("Chile"));
        let chart = country_focus(&table, "Chile", &BoundaryGeometry::default());
        assert!(chart.is_placeholder());
        assert_eq!(
            chart.layout.annotations[0].text,
            "No earthquake data available for Chile"
        );
        assert_eq!(chart.layout.title.as_deref(), Some("Earthquake Map - Chile"));
    }
}
