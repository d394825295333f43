//! Dataset overview used to populate selectors.

use quake_map_charts_models::ViewMode;
use quake_map_dataset::{Dataset, queries};
use quake_map_dataset_models::{LoadReport, MagnitudeRange};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub report: LoadReport,
    pub records: usize,
    pub years: Vec<i32>,
    pub countries: Vec<String>,
    /// Smallest and largest magnitude, `None` for an empty dataset.
    pub magnitude: Option<MagnitudeRange>,
    pub views: Vec<ViewMode>,
}

#[must_use]
pub fn summarize(dataset: &Dataset) -> DatasetSummary {
    let magnitude = dataset
        .records()
        .iter()
        .map(|r| r.magnitude)
        .fold(None::<MagnitudeRange>, |acc, m| {
            Some(match acc {
                None => MagnitudeRange::new(m, m),
                Some(range) => MagnitudeRange::new(range.min.min(m), range.max.max(m)),
            })
        });

    DatasetSummary {
        report: *dataset.report(),
        records: dataset.len(),
        years: queries::available_years(dataset),
        countries: queries::available_countries(dataset),
        magnitude,
        views: ViewMode::all().to_vec(),
    }
}
