//! Global map with one impact circle and epicentre marker per event.

use quake_map_charts_models::{
    ChartSpec, Fill, GeoMarkerTrace, GeoPathTrace, GeoPoint, GeoView, HoverMode, Layout,
    MarkerColor, MarkerSymbol, Projection,
};
use quake_map_dataset::Table;
use quake_map_geography::{BoundaryGeometry, DEFAULT_CIRCLE_POINTS, ImpactFormula, LatLon, impact_circle};
use quake_map_quake_models::magnitude_color;

use crate::whole_km;

const OUTLINE_COLOR: &str = "#34495e";
const OUTLINE_WIDTH: f64 = 0.8;
const CIRCLE_OPACITY: f64 = 0.2;
const MARKER_OPACITY: f64 = 0.7;
const MAP_HEIGHT: u32 = 700;
const PLACEHOLDER_HEIGHT: u32 = 600;

/// Parameters for [`world_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldMapOptions {
    pub formula: ImpactFormula,
    pub circle_points: usize,
}

impl Default for WorldMapOptions {
    fn default() -> Self {
        Self {
            formula: ImpactFormula::Exponential,
            circle_points: DEFAULT_CIRCLE_POINTS,
        }
    }
}

/// Marker diameter for a magnitude.
#[must_use]
pub fn marker_size(magnitude: f64) -> f64 {
    magnitude.mul_add(0.8, 3.0)
}

/// Builds the world map.
///
/// Boundary outlines come first so circles and markers draw on top. Each
/// event contributes a filled circle trace followed by a marker trace,
/// both colored by the five-band magnitude palette.
#[must_use]
pub fn world_map(
    table: &Table<'_>,
    boundaries: &BoundaryGeometry,
    options: &WorldMapOptions,
) -> ChartSpec {
    if table.is_empty() {
        return ChartSpec::placeholder(
            Layout::untitled(PLACEHOLDER_HEIGHT),
            "No earthquake data available",
        );
    }

    let mut chart = ChartSpec::new(
        Layout::untitled(MAP_HEIGHT)
            .with_geo(GeoView {
                center: Some(GeoPoint { lat: 20.0, lon: 0.0 }),
                ..GeoView::world(Projection::Equirectangular)
            })
            .with_hover_mode(HoverMode::Closest),
    );

    for outline in boundaries.outlines() {
        chart.push(GeoPathTrace {
            name: None,
            lat: outline.ring.iter().map(|p| p.lat).collect(),
            lon: outline.ring.iter().map(|p| p.lon).collect(),
            color: OUTLINE_COLOR.to_string(),
            width: OUTLINE_WIDTH,
            fill: None,
            show_legend: false,
            hoverable: false,
        });
    }

    for event in table.iter() {
        let color = magnitude_color(event.magnitude);
        let radius_km = options.formula.radius_km(event.magnitude);
        let ring = impact_circle(
            LatLon::new(event.latitude, event.longitude),
            radius_km,
            options.circle_points,
        );

        chart.push(GeoPathTrace {
            name: None,
            lat: ring.iter().map(|p| p.lat).collect(),
            lon: ring.iter().map(|p| p.lon).collect(),
            color: color.to_string(),
            width: 2.0,
            fill: Some(Fill {
                color: color.to_string(),
                opacity: CIRCLE_OPACITY,
            }),
            show_legend: false,
            hoverable: false,
        });

        chart.push(GeoMarkerTrace {
            name: None,
            lat: vec![event.latitude],
            lon: vec![event.longitude],
            size: vec![marker_size(event.magnitude)],
            color: MarkerColor::Solid(color.to_string()),
            symbol: MarkerSymbol::Circle,
            opacity: MARKER_OPACITY,
            text: vec![format!(
                "<b>{}</b><br>Magnitude: {}<br>Impact Radius: ~{} km<br>Year: {}",
                event.place,
                event.magnitude,
                whole_km(radius_km),
                event.year
            )],
            show_legend: false,
        });
    }

    log::debug!(
        "Built world map with {} events over {} boundaries",
        table.len(),
        boundaries.len()
    );

    chart
}
