//! Felt-radius estimates and the circles drawn for them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::LatLon;

/// Kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.32;

/// Samples per impact circle.
pub const DEFAULT_CIRCLE_POINTS: usize = 100;

/// Formula used to turn a magnitude into a felt radius in kilometres.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ImpactFormula {
    /// `exp(0.666 m + 1.6)`. Generous radii suited to the world overview.
    Exponential,
    /// `10^(0.5 m - 1.8)`. Tighter radii for the single-event view.
    Empirical,
}

impl ImpactFormula {
    /// Felt radius in kilometres for `magnitude`.
    #[must_use]
    pub fn radius_km(self, magnitude: f64) -> f64 {
        match self {
            Self::Exponential => magnitude.mul_add(0.666, 1.6).exp(),
            Self::Empirical => 10f64.powf(magnitude.mul_add(0.5, -1.8)),
        }
    }
}

/// Approximates a circle of `radius_km` around `center` as a closed ring.
///
/// Angles are spaced evenly over `[0, 2π]` inclusive, so the first and last
/// samples coincide. Longitude offsets are widened by `1 / cos(lat)`; at
/// the poles that factor is unbounded and the ring degenerates.
#[must_use]
pub fn impact_circle(center: LatLon, radius_km: f64, points: usize) -> Vec<LatLon> {
    if points == 0 {
        return Vec::new();
    }
    if points == 1 {
        return vec![LatLon::new(center.lat + radius_km / KM_PER_DEGREE, center.lon)];
    }

    let lat_step = radius_km / KM_PER_DEGREE;
    let lon_step = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos());

    #[allow(clippy::cast_precision_loss)]
    let last = (points - 1) as f64;

    (0..points)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let theta = std::f64::consts::TAU * (i as f64) / last;
            LatLon::new(
                lat_step.mul_add(theta.cos(), center.lat),
                lon_step.mul_add(theta.sin(), center.lon),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_radius_matches_formula() {
        let r = ImpactFormula::Exponential.radius_km(7.0);
        assert!((r - (7.0f64 * 0.666 + 1.6).exp()).abs() < 1e-9);
        assert!(r > 500.0 && r < 600.0);
    }

    #[test]
    fn empirical_radius_matches_formula() {
        let r = ImpactFormula::Empirical.radius_km(7.0);
        assert!((r - 10f64.powf(1.7)).abs() < 1e-9);
    }

    #[test]
    fn radii_grow_with_magnitude() {
        for formula in [ImpactFormula::Exponential, ImpactFormula::Empirical] {
            assert!(formula.radius_km(6.0) < formula.radius_km(6.5));
        }
    }

    #[test]
    fn parses_formula_names() {
        assert_eq!(
            "Exponential".parse::<ImpactFormula>().unwrap(),
            ImpactFormula::Exponential
        );
        assert_eq!(ImpactFormula::Empirical.to_string(), "empirical");
        assert!("linear".parse::<ImpactFormula>().is_err());
    }

    #[test]
    fn circle_is_closed_with_requested_points() {
        let ring = impact_circle(LatLon::new(0.0, 0.0), 111.32, DEFAULT_CIRCLE_POINTS);
        assert_eq!(ring.len(), 100);
        let (first, last) = (ring[0], ring[99]);
        assert!((first.lat - last.lat).abs() < 1e-9);
        assert!((first.lon - last.lon).abs() < 1e-9);
        assert!((first.lat - 1.0).abs() < 1e-9);
        assert!(first.lon.abs() < 1e-12);
    }

    #[test]
    fn circle_is_deterministic() {
        let center = LatLon::new(35.68, 139.69);
        assert_eq!(
            impact_circle(center, 50.0, DEFAULT_CIRCLE_POINTS),
            impact_circle(center, 50.0, DEFAULT_CIRCLE_POINTS)
        );
    }

    #[test]
    fn longitude_offset_widens_away_from_equator() {
        let radius = 100.0;
        let equator = impact_circle(LatLon::new(0.0, 0.0), radius, 5);
        let north = impact_circle(LatLon::new(60.0, 0.0), radius, 5);
        // index 1 of 5 samples is theta = pi / 2
        let eq_dlon = equator[1].lon.abs();
        let north_dlon = north[1].lon.abs();
        assert!((north_dlon / eq_dlon - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_point_counts() {
        assert!(impact_circle(LatLon::new(0.0, 0.0), 10.0, 0).is_empty());
        assert_eq!(impact_circle(LatLon::new(0.0, 0.0), 10.0, 1).len(), 1);
    }
}
