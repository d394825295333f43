#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry helpers for the quake map.
//!
//! Two concerns live here: the felt-radius circle drawn around each
//! epicentre ([`impact`]) and the optional country boundary polygons used
//! for map outlines, choropleth shapes, and country bounds
//! ([`boundaries`]).

pub mod boundaries;
pub mod impact;

use std::path::PathBuf;

use thiserror::Error;

pub use boundaries::{Boundary, BoundaryGeometry, Bounds, Outline};
pub use impact::{DEFAULT_CIRCLE_POINTS, ImpactFormula, KM_PER_DEGREE, impact_circle};

/// Errors that can occur while loading boundary geometry.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The boundary file could not be read.
    #[error("Failed to read boundaries from {}: {source}", path.display())]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid `GeoJSON`.
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] Box<geojson::Error>),

    /// The document parsed but is not a feature collection.
    #[error("Unsupported GeoJSON document: expected a FeatureCollection, got {kind}")]
    UnsupportedGeometry {
        /// What was found instead.
        kind: &'static str,
    },
}

impl From<geojson::Error> for GeoError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LatLon {
    /// Latitude, positive north.
    pub lat: f64,
    /// Longitude, positive east.
    pub lon: f64,
}

impl LatLon {
    /// Builds a position.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}
