//! Single-event impact view: felt-radius circle, epicentre star and nearby
//! events.

use quake_map_charts_models::{
    ChartSpec, ColorScale, Fill, GeoMarkerTrace, GeoPathTrace, GeoPoint, GeoView, Layout,
    MarkerColor, MarkerSymbol,
};
use quake_map_dataset::Table;
use quake_map_dataset_models::EarthquakeRecord;
use quake_map_geography::{DEFAULT_CIRCLE_POINTS, ImpactFormula, LatLon, impact_circle};

use crate::{MAGNITUDE_SCALE_TITLE, whole_km};

const TITLE: &str = "Epicentre Impact Analysis";
const HEIGHT: u32 = 500;
const ZOOM: f64 = 6.0;
const EPICENTRE_SIZE: f64 = 15.0;

/// Degree radius used to pick neighbouring events.
pub const NEARBY_RADIUS_DEG: f64 = 5.0;

/// Maximum number of neighbouring events shown.
pub const NEARBY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpicentreOptions {
    pub formula: ImpactFormula,
    /// Fixed felt radius in km. `None` or a non-positive value falls back
    /// to `formula`.
    pub radius_km: Option<f64>,
    pub circle_points: usize,
}

impl Default for EpicentreOptions {
    fn default() -> Self {
        Self {
            formula: ImpactFormula::Empirical,
            radius_km: None,
            circle_points: DEFAULT_CIRCLE_POINTS,
        }
    }
}

impl EpicentreOptions {
    /// Felt radius for `magnitude` under these options.
    #[must_use]
    pub fn radius_for(&self, magnitude: f64) -> f64 {
        self.radius_km
            .filter(|r| *r > 0.0)
            .unwrap_or_else(|| self.formula.radius_km(magnitude))
    }
}

/// Placeholder shown when there is no data at all.
#[must_use]
pub fn no_data() -> ChartSpec {
    ChartSpec::placeholder(Layout::titled(TITLE, HEIGHT), "No earthquake data available")
}

/// Builds the epicentre view for `event`, or a "not found" placeholder.
///
/// `nearby` is drawn as a magnitude-scaled marker layer when not empty.
#[must_use]
pub fn epicentre(
    event: Option<&EarthquakeRecord>,
    nearby: &Table<'_>,
    options: &EpicentreOptions,
) -> ChartSpec {
    let Some(event) = event else {
        return ChartSpec::placeholder(Layout::titled(TITLE, HEIGHT), "Earthquake not found");
    };

    let radius_km = options.radius_for(event.magnitude);
    let center = LatLon::new(event.latitude, event.longitude);
    let ring = impact_circle(center, radius_km, options.circle_points);

    let mut chart = ChartSpec::new(
        Layout::titled(
            format!(
                "{TITLE} - {} (Felt Radius: ~{} km)",
                event.place,
                whole_km(radius_km)
            ),
            HEIGHT,
        )
        .with_geo(GeoView::focused(
            GeoPoint {
                lat: event.latitude,
                lon: event.longitude,
            },
            ZOOM,
        ))
        .with_legend(true),
    );

    chart.push(GeoPathTrace {
        name: Some(format!("Impact Zone (~{}km)", whole_km(radius_km))),
        lat: ring.iter().map(|p| p.lat).collect(),
        lon: ring.iter().map(|p| p.lon).collect(),
        color: "red".to_string(),
        width: 2.0,
        fill: Some(Fill {
            color: "rgba(255, 0, 0, 0.1)".to_string(),
            opacity: 1.0,
        }),
        show_legend: true,
        hoverable: false,
    });

    chart.push(GeoMarkerTrace {
        name: Some("Epicentre".to_string()),
        lat: vec![event.latitude],
        lon: vec![event.longitude],
        size: vec![EPICENTRE_SIZE],
        color: MarkerColor::Solid("red".to_string()),
        symbol: MarkerSymbol::Star,
        opacity: 1.0,
        text: vec![format!(
            "Magnitude: {}<br>Depth: {}km<br>Time: {}",
            event.magnitude,
            event.depth,
            event.time.to_rfc3339()
        )],
        show_legend: true,
    });

    if !nearby.is_empty() {
        chart.push(GeoMarkerTrace {
            name: Some("Nearby Earthquakes".to_string()),
            lat: nearby.iter().map(|r| r.latitude).collect(),
            lon: nearby.iter().map(|r| r.longitude).collect(),
            size: nearby.iter().map(|r| r.magnitude * 2.0).collect(),
            color: MarkerColor::Scale {
                values: nearby.iter().map(|r| r.magnitude).collect(),
                scale: ColorScale::Reds,
                show_scale: true,
                color_bar_title: Some(MAGNITUDE_SCALE_TITLE.to_string()),
            },
            symbol: MarkerSymbol::Circle,
            opacity: 1.0,
            text: nearby.iter().map(|r| r.place.clone()).collect(),
            show_legend: true,
        });
    }

    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use quake_map_charts_models::Trace;
    use quake_map_dataset::queries;

    #[test]
    fn unknown_event_renders_not_found() {
        let dataset = fixtures::dataset();
        let chart = epicentre(
            queries::find_by_id(&dataset, "missing"),
            &dataset.table().retain(|_| false),
            &EpicentreOptions::default(),
        );
        assert!(chart.is_placeholder());
        assert_eq!(chart.layout.annotations[0].text, "Earthquake not found");
        assert_eq!(chart.layout.title.as_deref(), Some(TITLE));
    }

    #[test]
    fn draws_zone_star_and_neighbours() {
        let dataset = fixtures::dataset();
        let event = queries::find_by_id(&dataset, "tokyo").unwrap();
        let nearby = queries::nearby(
            &dataset,
            event.latitude,
            event.longitude,
            NEARBY_RADIUS_DEG,
            NEARBY_LIMIT,
        );
        let chart = epicentre(Some(event), &nearby, &EpicentreOptions::default());

        assert_eq!(chart.traces.len(), 3);
        let Trace::GeoPath(zone) = &chart.traces[0] else {
            panic!("expected zone");
        };
        // 10^(0.5 * 5.2 - 1.8) = 10^0.8 ~ 6.3
        assert_eq!(zone.name.as_deref(), Some("Impact Zone (~6km)"));
        assert_eq!(zone.lat.len(), DEFAULT_CIRCLE_POINTS);

        let Trace::GeoMarkers(star) = &chart.traces[1] else {
            panic!("expected epicentre");
        };
        assert_eq!(star.symbol, MarkerSymbol::Star);

        let Trace::GeoMarkers(neighbours) = &chart.traces[2] else {
            panic!("expected neighbours");
        };
        // Tokyo, Kobe, and Sendai are all within five degrees
        assert_eq!(neighbours.lat.len(), 3);
        assert!(
            chart
                .layout
                .title
                .as_deref()
                .unwrap()
                .contains("Tokyo, Japan (Felt Radius: ~6 km)")
        );
    }

    #[test]
    fn fixed_radius_overrides_formula() {
        let options = EpicentreOptions {
            radius_km: Some(120.0),
            ..EpicentreOptions::default()
        };
        assert!((options.radius_for(9.0) - 120.0).abs() < f64::EPSILON);

        let zero = EpicentreOptions {
            radius_km: Some(0.0),
            ..EpicentreOptions::default()
        };
        assert!((zero.radius_for(7.0) - 10f64.powf(1.7)).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_placeholder() {
        let chart = no_data();
        assert!(chart.is_placeholder());
        assert_eq!(chart.layout.annotations[0].text, "No earthquake data available");
    }
}
