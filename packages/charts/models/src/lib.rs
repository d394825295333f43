#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart specification types shared by the chart builders and whatever
//! renders them.
//!
//! A [`ChartSpec`] is plain data: traces (lines, filled geo paths,
//! markers, bars, choropleths) plus layout metadata. It serializes to
//! camelCase JSON and carries no rendering logic.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Font color used for "no data" messages.
pub const PLACEHOLDER_COLOR: &str = "gray";

/// Font size used for "no data" messages.
pub const PLACEHOLDER_FONT_SIZE: u32 = 16;

/// Dashboard view selector.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ViewMode {
    /// World map with impact circles.
    #[default]
    Map,
    /// Depth vs magnitude scatter.
    Scatter,
    /// Counts and average magnitude over time.
    TimeSeries,
    /// Per-country choropleth.
    RiskMap,
    /// Events of a single country.
    CountryFocus,
    /// One event's impact zone and its neighbours.
    Epicentre,
    /// Magnitude histogram.
    Distribution,
}

impl ViewMode {
    /// Every view, in navigation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Map,
            Self::Scatter,
            Self::TimeSeries,
            Self::RiskMap,
            Self::CountryFocus,
            Self::Epicentre,
            Self::Distribution,
        ]
    }

    /// Human-readable navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Map => "Global Map",
            Self::Scatter => "Depth vs Magnitude",
            Self::TimeSeries => "Trends Over Time",
            Self::RiskMap => "Risk Map",
            Self::CountryFocus => "Country Focus",
            Self::Epicentre => "Epicentre Impact",
            Self::Distribution => "Magnitude Distribution",
        }
    }
}

/// A renderable chart: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub traces: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    /// A chart with the given layout and no traces yet.
    #[must_use]
    pub const fn new(layout: Layout) -> Self {
        Self {
            traces: Vec::new(),
            layout,
        }
    }

    /// A chart with no traces and a centered message.
    #[must_use]
    pub fn placeholder(mut layout: Layout, message: impl Into<String>) -> Self {
        layout.annotations.push(Annotation::centered(message));
        Self::new(layout)
    }

    /// Whether this chart is a "no data" placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.traces.is_empty()
            && self
                .layout
                .annotations
                .iter()
                .any(|a| matches!(a.position, AnnotationPosition::Paper { .. }))
    }

    /// Appends a trace.
    pub fn push(&mut self, trace: impl Into<Trace>) {
        self.traces.push(trace.into());
    }
}

/// Layout metadata shared by every chart type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    /// Secondary y axis, drawn on the right and overlaying the primary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover_mode: Option<HoverMode>,
    pub show_legend: bool,
    pub annotations: Vec<Annotation>,
}

impl Layout {
    /// A layout with a title and fixed height.
    #[must_use]
    pub fn titled(title: impl Into<String>, height: u32) -> Self {
        Self {
            title: Some(title.into()),
            height,
            ..Self::default()
        }
    }

    /// A layout with only a fixed height.
    #[must_use]
    pub fn untitled(height: u32) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_axes(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis = Some(Axis::new(x));
        self.y_axis = Some(Axis::new(y));
        self
    }

    #[must_use]
    pub fn with_secondary_axis(mut self, axis: Axis) -> Self {
        self.y_axis2 = Some(axis);
        self
    }

    #[must_use]
    pub const fn with_geo(mut self, geo: GeoView) -> Self {
        self.geo = Some(geo);
        self
    }

    #[must_use]
    pub const fn with_hover_mode(mut self, mode: HoverMode) -> Self {
        self.hover_mode = Some(mode);
        self
    }

    #[must_use]
    pub const fn with_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self
    }
}

/// A titled axis with an optional fixed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

impl Axis {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            range: None,
        }
    }

    #[must_use]
    pub const fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some([min, max]);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoverMode {
    Closest,
    #[serde(rename = "x unified")]
    XUnified,
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Map projection used by geo charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Projection {
    Equirectangular,
    NaturalEarth,
    Mercator,
}

/// Viewport for geo charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoView {
    pub projection: Projection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat_range: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon_range: Option<[f64; 2]>,
}

impl GeoView {
    /// The whole globe.
    #[must_use]
    pub const fn world(projection: Projection) -> Self {
        Self {
            projection,
            center: None,
            zoom: None,
            lat_range: Some([-90.0, 90.0]),
            lon_range: Some([-180.0, 180.0]),
        }
    }

    /// A view centered on `center` at `zoom`.
    #[must_use]
    pub const fn focused(center: GeoPoint, zoom: f64) -> Self {
        Self {
            projection: Projection::Mercator,
            center: Some(center),
            zoom: Some(zoom),
            lat_range: None,
            lon_range: None,
        }
    }
}

/// Where an annotation is anchored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "ref", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AnnotationPosition {
    /// Fractional coordinates of the plotting area (`0.0..=1.0`).
    Paper { x: f64, y: f64 },
    /// A data point on a date axis.
    Data { x: NaiveDate, y: f64, y_axis: YAxis },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub text: String,
    pub position: AnnotationPosition,
    pub show_arrow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Annotation {
    /// A gray message centered in the plotting area.
    #[must_use]
    pub fn centered(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: AnnotationPosition::Paper { x: 0.5, y: 0.5 },
            show_arrow: false,
            font_size: Some(PLACEHOLDER_FONT_SIZE),
            color: Some(PLACEHOLDER_COLOR.to_string()),
        }
    }

    /// An arrow pointing at a data point.
    #[must_use]
    pub fn at_point(text: impl Into<String>, x: NaiveDate, y: f64, y_axis: YAxis) -> Self {
        Self {
            text: text.into(),
            position: AnnotationPosition::Data { x, y, y_axis },
            show_arrow: true,
            font_size: None,
            color: None,
        }
    }
}

/// Which y axis a trace is plotted against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YAxis {
    #[default]
    Y,
    Y2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    #[default]
    Solid,
    Dash,
    Dot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    #[default]
    Circle,
    Star,
}

/// Continuous color scales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ColorScale {
    #[default]
    Reds,
}

/// Marker coloring: one color, one per point, or a continuous scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerColor {
    Solid(String),
    PerPoint(Vec<String>),
    Scale {
        values: Vec<f64>,
        scale: ColorScale,
        #[serde(rename = "showScale")]
        show_scale: bool,
        #[serde(rename = "colorBarTitle", skip_serializing_if = "Option::is_none")]
        color_bar_title: Option<String>,
    },
}

/// Polygon fill for geo paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fill {
    pub color: String,
    pub opacity: f64,
}

/// A date-indexed line (time series).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTrace {
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub y_axis: YAxis,
    pub color: String,
    pub width: f64,
    pub dash: LineDash,
    pub show_markers: bool,
}

/// Cartesian markers (scatter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub size: Vec<f64>,
    pub color: MarkerColor,
    pub text: Vec<String>,
}

/// A line or filled polygon on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPathTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    pub show_legend: bool,
    pub hoverable: bool,
}

/// Markers on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoMarkerTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub size: Vec<f64>,
    pub color: MarkerColor,
    pub symbol: MarkerSymbol,
    pub opacity: f64,
    pub text: Vec<String>,
    pub show_legend: bool,
}

/// How choropleth locations are matched to shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationMode {
    /// The renderer resolves country names itself.
    CountryNames,
    /// Locations match the `name` of the shapes embedded in the trace.
    FeatureName,
}

/// A named region drawn by a choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionShape {
    pub name: String,
    /// Exterior rings, one per polygon part.
    pub rings: Vec<Vec<GeoPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub values: Vec<f64>,
    pub location_mode: LocationMode,
    pub color_scale: ColorScale,
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub shapes: Vec<RegionShape>,
}

/// Histogram bars positioned by bin center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarTrace {
    pub name: String,
    pub x: Vec<f64>,
    pub width: Vec<f64>,
    pub y: Vec<u64>,
    pub color: String,
}

/// Any chart trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Trace {
    Line(LineTrace),
    Markers(MarkerTrace),
    GeoPath(GeoPathTrace),
    GeoMarkers(GeoMarkerTrace),
    Choropleth(ChoroplethTrace),
    Bars(BarTrace),
}

impl From<LineTrace> for Trace {
    fn from(t: LineTrace) -> Self {
        Self::Line(t)
    }
}

impl From<MarkerTrace> for Trace {
    fn from(t: MarkerTrace) -> Self {
        Self::Markers(t)
    }
}

impl From<GeoPathTrace> for Trace {
    fn from(t: GeoPathTrace) -> Self {
        Self::GeoPath(t)
    }
}

impl From<GeoMarkerTrace> for Trace {
    fn from(t: GeoMarkerTrace) -> Self {
        Self::GeoMarkers(t)
    }
}

impl From<ChoroplethTrace> for Trace {
    fn from(t: ChoroplethTrace) -> Self {
        Self::Choropleth(t)
    }
}

impl From<BarTrace> for Trace {
    fn from(t: BarTrace) -> Self {
        Self::Bars(t)
    }
}
