//! Depth vs magnitude scatter.

use quake_map_charts_models::{ChartSpec, Layout, MarkerColor, MarkerTrace};
use quake_map_dataset::{Table, queries};
use quake_map_dataset_models::{FilterCriteria, MagnitudeRange};
use quake_map_quake_models::MagnitudeCategory;

use crate::category_color;

const TITLE: &str = "Depth vs Magnitude Relationship";
const X_TITLE: &str = "Magnitude";
const Y_TITLE: &str = "Depth (km)";
const HEIGHT: u32 = 500;

/// Builds the scatter after narrowing `table` by country substring and
/// magnitude range. One marker trace per magnitude category present, in
/// low-to-high order.
#[must_use]
pub fn scatter(
    table: &Table<'_>,
    country: Option<&str>,
    magnitude_range: Option<MagnitudeRange>,
) -> ChartSpec {
    let mut criteria = FilterCriteria::all();
    if let Some(country) = country {
        criteria = criteria.with_country(country);
    }
    criteria.magnitude_range = magnitude_range;

    let rows = table.retain(|r| queries::matches(&criteria, r));

    let layout = Layout::titled(TITLE, HEIGHT).with_axes(X_TITLE, Y_TITLE);
    if rows.is_empty() {
        return ChartSpec::placeholder(layout, "No data available for scatter plot");
    }

    let mut chart = ChartSpec::new(layout.with_legend(true));

    for &category in MagnitudeCategory::all() {
        let group = rows.retain(|r| r.magnitude_category == category);
        if group.is_empty() {
            continue;
        }

        chart.push(MarkerTrace {
            name: category.label().to_string(),
            x: group.iter().map(|r| r.magnitude).collect(),
            y: group.iter().map(|r| r.depth).collect(),
            size: group.iter().map(|r| r.magnitude).collect(),
            color: MarkerColor::Solid(category_color(category).to_string()),
            text: group
                .iter()
                .map(|r| {
                    format!(
                        "<b>{}</b><br>{}<br>{}",
                        r.place,
                        r.time.format("%Y-%m-%d %H:%M UTC"),
                        r.country.as_deref().unwrap_or("Unknown")
                    )
                })
                .collect(),
        });
    }

    chart
}
