#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Earthquake magnitude taxonomy and display palette definitions.
//!
//! This crate defines the two magnitude classifications used across the
//! quake-map system: the coarse three-level [`MagnitudeCategory`] used for
//! filtering and legends, and the five-band [`MagnitudeBand`] palette used
//! to color impact circles on the world map.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lower bound (inclusive) of the [`MagnitudeCategory::Medium`] bucket.
pub const MEDIUM_THRESHOLD: f64 = 5.0;

/// Lower bound (inclusive) of the [`MagnitudeCategory::High`] bucket.
pub const HIGH_THRESHOLD: f64 = 6.5;

/// Coarse severity bucket derived from a numeric magnitude.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MagnitudeCategory {
    /// Magnitude below 5.0
    Low,
    /// Magnitude in `[5.0, 6.5)`
    Medium,
    /// Magnitude of 6.5 and above
    High,
}

impl MagnitudeCategory {
    /// Classifies a magnitude against the fixed 5.0 / 6.5 thresholds.
    ///
    /// `NaN` never reaches this function after load, but is classified as
    /// [`Self::Low`] rather than panicking.
    #[must_use]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= HIGH_THRESHOLD {
            Self::High
        } else if magnitude >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Human-readable label used in legends and chart titles.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Returns all variants of this enum, from least to most severe.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Five-band magnitude classification used for map coloring.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MagnitudeBand {
    /// Below 6.0
    Moderate,
    /// `[6.0, 6.5)`
    Strong,
    /// `[6.5, 7.0)`
    Major,
    /// `[7.0, 7.5)`
    Severe,
    /// 7.5 and above
    Great,
}

impl MagnitudeBand {
    /// Classifies a magnitude into its display band.
    #[must_use]
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude < 6.0 {
            Self::Moderate
        } else if magnitude < 6.5 {
            Self::Strong
        } else if magnitude < 7.0 {
            Self::Major
        } else if magnitude < 7.5 {
            Self::Severe
        } else {
            Self::Great
        }
    }

    /// Hex color for this band.
    ///
    /// `Major` and `Great` intentionally share the same red.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Moderate => "#ffb86c",
            Self::Strong => "#ff79c6",
            Self::Major | Self::Great => "#ff5555",
            Self::Severe => "#bd93f9",
        }
    }

    /// Returns all variants of this enum, from least to most severe.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Moderate,
            Self::Strong,
            Self::Major,
            Self::Severe,
            Self::Great,
        ]
    }
}

/// Shorthand for `MagnitudeBand::from_magnitude(magnitude).color()`.
#[must_use]
pub fn magnitude_color(magnitude: f64) -> &'static str {
    MagnitudeBand::from_magnitude(magnitude).color()
}
