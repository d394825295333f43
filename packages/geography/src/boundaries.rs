//! Country boundary polygons read from a `GeoJSON` feature collection.
//!
//! Boundaries are loaded once at startup. Each feature contributes its
//! `name` property and its `Polygon`/`MultiPolygon` geometry; features with
//! anything else are skipped.

use std::path::Path;

use geo::{BoundingRect, MultiPolygon};
use geojson::{Feature, GeoJson};

use crate::{GeoError, LatLon};

/// Feature properties checked, in order, for a boundary name.
const NAME_PROPERTIES: &[&str] = &["name", "NAME", "ADMIN"];

/// One named boundary.
#[derive(Debug, Clone)]
pub struct Boundary {
    /// Country (or region) name from the feature properties.
    pub name: String,
    /// Boundary shape.
    pub polygon: MultiPolygon<f64>,
}

impl Boundary {
    /// Exterior rings, one per polygon part.
    #[must_use]
    pub fn rings(&self) -> Vec<Vec<LatLon>> {
        self.polygon
            .0
            .iter()
            .map(|polygon| {
                polygon
                    .exterior()
                    .coords()
                    .map(|c| LatLon::new(c.y, c.x))
                    .collect()
            })
            .collect()
    }
}

/// Exterior ring of one polygon part, ready to draw as a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    /// Name of the boundary the ring belongs to.
    pub name: String,
    /// Ring vertices in order.
    pub ring: Vec<LatLon>,
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> LatLon {
        LatLon::new(
            f64::midpoint(self.min_lat, self.max_lat),
            f64::midpoint(self.min_lon, self.max_lon),
        )
    }
}

/// Every boundary loaded at startup. Empty means "render without
/// boundaries".
#[derive(Debug, Clone, Default)]
pub struct BoundaryGeometry {
    boundaries: Vec<Boundary>,
}

impl BoundaryGeometry {
    /// Parses a `GeoJSON` `FeatureCollection` (or a single `Feature`).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::GeoJson`] if the text is not valid `GeoJSON`, or
    /// [`GeoError::UnsupportedGeometry`] if it is a bare geometry.
    pub fn from_geojson_str(text: &str) -> Result<Self, GeoError> {
        let features = match text.parse::<GeoJson>()? {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(_) => {
                return Err(GeoError::UnsupportedGeometry { kind: "Geometry" });
            }
        };

        let total = features.len();
        let boundaries: Vec<Boundary> = features.into_iter().filter_map(to_boundary).collect();

        if boundaries.len() < total {
            log::debug!(
                "Skipped {} of {total} boundary features without a name or polygon geometry",
                total - boundaries.len()
            );
        }

        Ok(Self { boundaries })
    }

    /// Reads and parses a boundary file.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeoError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let geometry = Self::from_geojson_str(&text)?;
        log::info!(
            "Loaded {} boundaries from {}",
            geometry.len(),
            path.display()
        );
        Ok(geometry)
    }

    /// Like [`Self::load`], but any failure is logged and yields no
    /// boundaries.
    #[must_use]
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::debug!("No boundary file configured, rendering without boundaries");
            return Self::default();
        };

        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e}; rendering without boundaries");
            Self::default()
        })
    }

    /// All loaded boundaries.
    #[must_use]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Boundary> {
        let name = name.trim();
        self.boundaries
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Bounding box of the named boundary.
    #[must_use]
    pub fn bounds(&self, name: &str) -> Option<Bounds> {
        let rect = self.find(name)?.polygon.bounding_rect()?;
        Some(Bounds {
            min_lat: rect.min().y,
            min_lon: rect.min().x,
            max_lat: rect.max().y,
            max_lon: rect.max().x,
        })
    }

    /// Exterior rings of every polygon part, one entry per part.
    #[must_use]
    pub fn outlines(&self) -> Vec<Outline> {
        self.boundaries
            .iter()
            .flat_map(|b| {
                b.rings().into_iter().map(|ring| Outline {
                    name: b.name.clone(),
                    ring,
                })
            })
            .collect()
    }
}

fn feature_name(feature: &Feature) -> Option<String> {
    NAME_PROPERTIES
        .iter()
        .find_map(|key| feature.property(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn to_boundary(feature: Feature) -> Option<Boundary> {
    let name = feature_name(&feature)?;
    let geometry = feature.geometry?;

    let polygon = match geo::Geometry::<f64>::try_from(geometry).ok()? {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };

    Some(Boundary { name, polygon })
}
