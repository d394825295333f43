//! View selection and dispatch.
//!
//! A [`DashboardContext`] is built once at startup and handed to
//! [`render`] by reference for every request. [`render`] runs the
//! request's query against the dataset and passes the result to the
//! matching chart builder.

use std::sync::Arc;

use quake_map_charts_models::{ChartSpec, ViewMode};
use quake_map_dataset::{Dataset, queries};
use quake_map_dataset_models::{
    DateRange, FilterCriteria, MagnitudeRange, MonthSelection, RiskMetric,
};
use quake_map_geography::{BoundaryGeometry, DEFAULT_CIRCLE_POINTS, ImpactFormula};
use quake_map_quake_models::MagnitudeCategory;

use crate::country_focus::country_focus;
use crate::distribution::distribution;
use crate::epicentre::{self, EpicentreOptions, NEARBY_LIMIT, NEARBY_RADIUS_DEG};
use crate::risk_map::risk_map;
use crate::scatter::scatter;
use crate::time_series::{TimeSeriesOptions, time_series};
use crate::world_map::{WorldMapOptions, world_map};

/// Radius formula used by each map view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactPresets {
    pub map: ImpactFormula,
    pub epicentre: ImpactFormula,
}

impl Default for ImpactPresets {
    fn default() -> Self {
        Self {
            map: ImpactFormula::Exponential,
            epicentre: ImpactFormula::Empirical,
        }
    }
}

/// Everything a request needs, shared read-only across requests.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    dataset: Arc<Dataset>,
    boundaries: Arc<BoundaryGeometry>,
    presets: ImpactPresets,
}

impl DashboardContext {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, boundaries: BoundaryGeometry, presets: ImpactPresets) -> Self {
        Self {
            dataset,
            boundaries: Arc::new(boundaries),
            presets,
        }
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn boundaries(&self) -> &BoundaryGeometry {
        &self.boundaries
    }

    #[must_use]
    pub const fn presets(&self) -> ImpactPresets {
        self.presets
    }
}

/// One chart request with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewRequest {
    Map {
        year: Option<i32>,
    },
    Scatter {
        country: Option<String>,
        magnitude_range: Option<MagnitudeRange>,
    },
    TimeSeries {
        year: i32,
        month: MonthSelection,
        country: Option<String>,
        category: Option<MagnitudeCategory>,
        cumulative: bool,
        moving_average: bool,
    },
    RiskMap {
        metric: RiskMetric,
    },
    CountryFocus {
        country: String,
        date_range: Option<DateRange>,
    },
    Epicentre {
        id: String,
        /// Fixed felt radius in km; `None` uses the epicentre preset.
        radius_km: Option<f64>,
    },
    Distribution {
        criteria: FilterCriteria,
        bins: usize,
    },
}

impl ViewRequest {
    /// The view this request renders.
    #[must_use]
    pub const fn mode(&self) -> ViewMode {
        match self {
            Self::Map { .. } => ViewMode::Map,
            Self::Scatter { .. } => ViewMode::Scatter,
            Self::TimeSeries { .. } => ViewMode::TimeSeries,
            Self::RiskMap { .. } => ViewMode::RiskMap,
            Self::CountryFocus { .. } => ViewMode::CountryFocus,
            Self::Epicentre { .. } => ViewMode::Epicentre,
            Self::Distribution { .. } => ViewMode::Distribution,
        }
    }
}

/// Runs the request's query and builds its chart.
#[must_use]
pub fn render(ctx: &DashboardContext, request: &ViewRequest) -> ChartSpec {
    log::debug!("Rendering {} view: {request:?}", request.mode());

    let dataset = ctx.dataset();
    match request {
        ViewRequest::Map { year } => {
            let criteria = year.map_or_else(FilterCriteria::all, |y| FilterCriteria::all().with_year(y));
            world_map(
                &queries::get_filtered(dataset, &criteria),
                ctx.boundaries(),
                &WorldMapOptions {
                    formula: ctx.presets.map,
                    circle_points: DEFAULT_CIRCLE_POINTS,
                },
            )
        }
        ViewRequest::Scatter {
            country,
            magnitude_range,
        } => scatter(&dataset.table(), country.as_deref(), *magnitude_range),
        ViewRequest::TimeSeries {
            year,
            month,
            country,
            category,
            cumulative,
            moving_average,
        } => {
            let mut base = FilterCriteria::all();
            if let Some(country) = country {
                base = base.with_country(country);
            }
            if let Some(category) = category {
                base = base.with_category(*category);
            }
            let series = queries::time_series_for_period(dataset, *year, *month, &base);
            time_series(
                &series,
                &TimeSeriesOptions {
                    cumulative: *cumulative,
                    moving_average: *moving_average,
                    country: base.country.clone(),
                    category: *category,
                },
            )
        }
        ViewRequest::RiskMap { metric } => risk_map(
            &queries::get_risk_summary(dataset, *metric),
            *metric,
            ctx.boundaries(),
        ),
        ViewRequest::CountryFocus {
            country,
            date_range,
        } => {
            let mut criteria = FilterCriteria::all().with_country(country);
            criteria.date_range = *date_range;
            country_focus(
                &queries::get_filtered(dataset, &criteria),
                country.trim(),
                ctx.boundaries(),
            )
        }
        ViewRequest::Epicentre { id, radius_km } => {
            if dataset.is_empty() {
                return epicentre::no_data();
            }
            let event = queries::find_by_id(dataset, id);
            let nearby = event.map_or_else(
                || dataset.table().retain(|_| false),
                |e| queries::nearby(dataset, e.latitude, e.longitude, NEARBY_RADIUS_DEG, NEARBY_LIMIT),
            );
            epicentre::epicentre(
                event,
                &nearby,
                &EpicentreOptions {
                    formula: ctx.presets.epicentre,
                    radius_km: *radius_km,
                    circle_points: DEFAULT_CIRCLE_POINTS,
                },
            )
        }
        ViewRequest::Distribution { criteria, bins } => distribution(&queries::magnitude_histogram(
            &queries::get_filtered(dataset, criteria),
            *bins,
        )),
    }
}

/// One entry of the navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub mode: ViewMode,
    pub label: &'static str,
    pub active: bool,
}

/// The single current view selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    current: ViewMode,
}

impl Navigation {
    #[must_use]
    pub const fn new(current: ViewMode) -> Self {
        Self { current }
    }

    #[must_use]
    pub const fn current(&self) -> ViewMode {
        self.current
    }

    /// Makes `mode` the current view. Returns the previous one.
    pub const fn select(&mut self, mode: ViewMode) -> ViewMode {
        let previous = self.current;
        self.current = mode;
        previous
    }

    /// Selects the view a request renders.
    pub const fn follow(&mut self, request: &ViewRequest) -> ViewMode {
        self.select(request.mode())
    }

    #[must_use]
    pub fn is_active(&self, mode: ViewMode) -> bool {
        self.current == mode
    }

    /// Every view with exactly one marked active.
    #[must_use]
    pub fn entries(&self) -> Vec<NavEntry> {
        ViewMode::all()
            .iter()
            .map(|&mode| NavEntry {
                mode,
                label: mode.label(),
                active: self.is_active(mode),
            })
            .collect()
    }
}
