//! JSON envelope written for every rendered view.

use quake_map_charts::{Navigation, ViewRequest};
use quake_map_charts_models::{ChartSpec, ViewMode};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub mode: ViewMode,
    pub label: &'static str,
    pub active: bool,
}

/// The chart plus the navigation state that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedView {
    pub view: ViewMode,
    pub navigation: Vec<MenuItem>,
    pub chart: ChartSpec,
}

impl RenderedView {
    /// Moves `navigation` to the request's view and wraps `chart`.
    #[must_use]
    pub fn new(navigation: &mut Navigation, request: &ViewRequest, chart: ChartSpec) -> Self {
        let previous = navigation.follow(request);
        if previous != navigation.current() {
            log::debug!("Switched view {previous} -> {}", navigation.current());
        }
        Self {
            view: navigation.current(),
            navigation: navigation
                .entries()
                .into_iter()
                .map(|e| MenuItem {
                    mode: e.mode,
                    label: e.label,
                    active: e.active,
                })
                .collect(),
            chart,
        }
    }
}
