#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart builders for the quake map dashboard.
//!
//! Every builder is a pure function from query output (a [`Table`] view,
//! an aggregated series, or summary rows) plus parameters to a
//! [`ChartSpec`]. Builders never touch the dataset directly; the
//! [`dashboard`] module runs the queries and dispatches to them. Empty
//! input always yields a placeholder chart rather than an error.
//!
//! [`Table`]: quake_map_dataset::Table
//! [`ChartSpec`]: quake_map_charts_models::ChartSpec

pub mod country_focus;
pub mod dashboard;
pub mod distribution;
pub mod epicentre;
pub mod risk_map;
pub mod scatter;
pub mod time_series;
pub mod world_map;

use quake_map_charts_models::GeoPoint;
use quake_map_geography::LatLon;
use quake_map_quake_models::MagnitudeCategory;

pub use dashboard::{DashboardContext, ImpactPresets, NavEntry, Navigation, ViewRequest, render};

/// Colorbar title for magnitude-scaled markers.
pub const MAGNITUDE_SCALE_TITLE: &str = "Magnitude";

const fn geo_point(p: LatLon) -> GeoPoint {
    GeoPoint {
        lat: p.lat,
        lon: p.lon,
    }
}

/// Display color for a magnitude category.
#[must_use]
pub const fn category_color(category: MagnitudeCategory) -> &'static str {
    match category {
        MagnitudeCategory::Low => "#f1fa8c",
        MagnitudeCategory::Medium => "#ffb86c",
        MagnitudeCategory::High => "#ff5555",
    }
}

/// Whole kilometres, for labels.
#[allow(clippy::cast_possible_truncation)]
fn whole_km(radius_km: f64) -> i64 {
    radius_km.trunc() as i64
}
